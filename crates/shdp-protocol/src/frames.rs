//! Frame and event-code types for the SHDP protocol.
//!
//! A frame is the outer envelope carried over the transport: a fixed
//! 7-byte big-endian header (`version:u8, event:u16, data_length_bits:u32`)
//! followed by `ceil(data_length_bits / 8)` payload bytes.

use bytes::Bytes;

/// First event code of the application-defined private range.
pub const PRIVATE_EVENT_FLOOR: u16 = 0x1000;

/// Reserved event codes with protocol-assigned meaning.
///
/// Payload semantics belong to the event router; only the framing rules
/// live in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EventCode {
    /// Client asks the server for a component by name.
    ComponentNeedsRequest = 0x0000,
    /// Server delivers a compressed markup file.
    HtmlFileResponse = 0x0001,
    /// Either side reports an error for a prior request.
    ErrorResponse = 0x0002,
    /// Server describes the component being delivered.
    ComponentNeedsResponse = 0x0003,
    /// Server delivers a fully fyve-packed file.
    FullFyveResponse = 0x0004,
    /// Client reports a user interaction.
    InteractionRequest = 0x0005,
    /// Server answers an interaction.
    InteractionResponse = 0x0006,
}

impl From<EventCode> for u16 {
    fn from(code: EventCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for EventCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, u16> {
        match value {
            0x0000 => Ok(EventCode::ComponentNeedsRequest),
            0x0001 => Ok(EventCode::HtmlFileResponse),
            0x0002 => Ok(EventCode::ErrorResponse),
            0x0003 => Ok(EventCode::ComponentNeedsResponse),
            0x0004 => Ok(EventCode::FullFyveResponse),
            0x0005 => Ok(EventCode::InteractionRequest),
            0x0006 => Ok(EventCode::InteractionResponse),
            other => Err(other),
        }
    }
}

/// Whether an event code is in the application-defined private range.
#[must_use]
pub fn is_private_event(event: u16) -> bool {
    event >= PRIVATE_EVENT_FLOOR
}

/// A decoded SHDP frame.
///
/// `data_length_bits` is the exact payload bit count; any bits beyond it
/// in the final payload byte are padding, are always zero, and are never
/// interpreted as data. A frame with fewer than 8 payload bits is invalid
/// and is never delivered to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Protocol version from the header.
    pub version: u8,
    /// Event code selecting the payload's meaning.
    pub event: u16,
    /// Exact payload length in bits, pad excluded.
    pub data_length_bits: u32,
    /// Payload bytes, `ceil(data_length_bits / 8)` of them.
    pub payload: Bytes,
}

impl Frame {
    /// The reserved event code for this frame, if it has one.
    #[must_use]
    pub fn event_code(&self) -> Option<EventCode> {
        EventCode::try_from(self.event).ok()
    }

    /// Payload length in whole bytes.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
