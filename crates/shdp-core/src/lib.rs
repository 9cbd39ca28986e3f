//! # shdp-core
//!
//! Event routing and typed event payloads for SHDP.
//!
//! This crate sits between a byte-stream transport (not provided here)
//! and the codec crates: inbound bytes are decoded into frames, dispatched
//! to registered handlers by `(version, event)`, and the handlers' replies
//! are framed back into bytes. Failure policy differs by side: servers
//! answer bad frames with `ERROR_RESPONSE`, clients discard them.
//!
//! ```text
//! inbound bytes ──▶ frame codec ──▶ Router ──▶ handler
//!                                     │            │
//! outbound bytes ◀── frame codec ◀────┴── replies ◀┘
//! ```

pub mod events;
pub mod router;

pub use events::{ComponentNeedsRequest, ComponentNeedsResponse, ErrorResponse, PayloadError};
pub use router::{DispatchError, EventHandler, OutboundEvent, Role, Router};
