//! # shdp-codec
//!
//! The compressed markup codec at the heart of SHDP.
//!
//! An HTML-like document tree is packed into a bit stream of 5-bit symbols
//! ("fyves"), a small set of structural operating codes, and literal UTF-8
//! byte chains for text content and attribute values. The codec is pure and
//! synchronous: encode and decode are functions from a value to a value,
//! with no I/O and no shared mutable state, so concurrent calls over
//! independent buffers need no locking.
//!
//! ## Example
//!
//! ```rust
//! use shdp_codec::{decode_document, encode_document, Document, Node};
//!
//! let document = Document::new().with(
//!     Node::new("p")
//!         .with_attribute("class", "intro")
//!         .with_text("Hello, world!"),
//! );
//!
//! let stream = encode_document(&document).unwrap();
//! assert_eq!(decode_document(&stream).unwrap(), document);
//! ```

pub mod bits;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod payload;
pub mod symbols;
pub mod tree;

pub use bits::{BitReader, BitWriter, FyveStream};
pub use decoder::decode_document;
pub use encoder::encode_document;
pub use error::CodecError;
pub use payload::{decode_html_file, decode_html_payload, encode_html_file, encode_html_payload};
pub use symbols::{decode_symbol, encode_symbol, OpCode};
pub use tree::{Content, Document, Node};

/// Deepest element nesting the codec will encode or decode.
pub const MAX_DEPTH: usize = 64;
