//! # shdp-protocol
//!
//! Frame envelope and event codes for the SHDP binary protocol.
//!
//! Every SHDP exchange travels as a frame: a 7-byte big-endian header
//! (`version:u8, event:u16, data_length_bits:u32`) followed by the
//! payload. The payload length field counts *bits*, not bytes, because
//! payloads may end mid-byte (fyve-packed markup does).
//!
//! ## Example
//!
//! ```rust
//! use shdp_protocol::{codec, PROTOCOL_VERSION};
//!
//! let payload = b"home";
//! let bytes = codec::encode(PROTOCOL_VERSION, 0x0000, payload, 32).unwrap();
//! let frame = codec::decode(&bytes).unwrap();
//! assert_eq!(&frame.payload[..], payload);
//! ```

pub mod codec;
pub mod frames;
pub mod version;

pub use codec::{decode, encode, encode_frame, FrameError, HEADER_SIZE};
pub use frames::{is_private_event, EventCode, Frame, PRIVATE_EVENT_FLOOR};
pub use version::{is_supported, PROTOCOL_VERSION};
