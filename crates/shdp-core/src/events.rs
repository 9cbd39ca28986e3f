//! Typed payloads for the router-owned events.
//!
//! The frame codec treats payloads as opaque; these types give the events
//! whose payloads the router itself produces and consumes a concrete
//! shape. Markup payloads (`HTML_FILE_RESPONSE`) are the markup codec's
//! business and are not duplicated here.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use shdp_protocol::{EventCode, Frame};

/// Errors raised while parsing a typed event payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The frame carries a different event than the type expects.
    #[error("Expected event 0x{expected:04x}, frame carries 0x{actual:04x}")]
    WrongEvent {
        /// Event code the type parses.
        expected: u16,
        /// Event code found in the frame.
        actual: u16,
    },

    /// Payload text is not valid UTF-8.
    #[error("Payload is not valid UTF-8")]
    InvalidUtf8,

    /// Payload structure does not match the event's layout.
    #[error("Malformed payload: {0}")]
    Malformed(&'static str),
}

fn expect_event(frame: &Frame, expected: EventCode) -> Result<(), PayloadError> {
    let expected = u16::from(expected);
    if frame.event != expected {
        return Err(PayloadError::WrongEvent {
            expected,
            actual: frame.event,
        });
    }
    Ok(())
}

/// Payload bytes that the declared bit length actually covers.
///
/// Byte-oriented payloads always declare whole bytes; the floor guards
/// against a declared length ending mid-byte.
fn content_bytes(frame: &Frame) -> &[u8] {
    &frame.payload[..frame.data_length_bits as usize / 8]
}

/// `COMPONENT_NEEDS_REQUEST` (0x0000): a component name as raw UTF-8
/// running to the end of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNeedsRequest {
    /// Name of the requested component.
    pub component: String,
}

impl ComponentNeedsRequest {
    /// Create a request for a named component.
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Parse the request out of a decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::WrongEvent`] for a foreign event code and
    /// [`PayloadError::InvalidUtf8`] for a non-UTF-8 name.
    pub fn from_frame(frame: &Frame) -> Result<Self, PayloadError> {
        expect_event(frame, EventCode::ComponentNeedsRequest)?;
        let component = std::str::from_utf8(content_bytes(frame))
            .map_err(|_| PayloadError::InvalidUtf8)?
            .to_string();
        Ok(Self { component })
    }

    /// Serialize to payload bytes plus their exact bit length.
    #[must_use]
    pub fn to_payload(&self) -> (Bytes, u32) {
        let bytes = Bytes::copy_from_slice(self.component.as_bytes());
        let bits = bytes.len() as u32 * 8;
        (bytes, bits)
    }
}

/// `ERROR_RESPONSE` (0x0002): `code:u16`, a `0x00` separator, then the
/// message as raw UTF-8 to the end of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Numeric error code.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Create an error response.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse the error out of a decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] if the payload is shorter than
    /// the code and separator, or the separator byte is missing.
    pub fn from_frame(frame: &Frame) -> Result<Self, PayloadError> {
        expect_event(frame, EventCode::ErrorResponse)?;
        let bytes = content_bytes(frame);
        if bytes.len() < 3 {
            return Err(PayloadError::Malformed("error payload too short"));
        }
        if bytes[2] != 0 {
            return Err(PayloadError::Malformed("missing separator after code"));
        }

        let code = u16::from_be_bytes([bytes[0], bytes[1]]);
        let message = std::str::from_utf8(&bytes[3..])
            .map_err(|_| PayloadError::InvalidUtf8)?
            .to_string();
        Ok(Self { code, message })
    }

    /// Serialize to payload bytes plus their exact bit length.
    #[must_use]
    pub fn to_payload(&self) -> (Bytes, u32) {
        let mut buf = BytesMut::with_capacity(3 + self.message.len());
        buf.put_u16(self.code);
        buf.put_u8(0);
        buf.put_slice(self.message.as_bytes());

        let bits = buf.len() as u32 * 8;
        (buf.freeze(), bits)
    }
}

/// `COMPONENT_NEEDS_RESPONSE` (0x0003): NUL-separated UTF-8 segments —
/// the component name, an optional title (empty segment when absent),
/// then one segment per delivered file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNeedsResponse {
    /// Name of the delivered component.
    pub component: String,
    /// Optional page title.
    pub title: Option<String>,
    /// File names delivered alongside this response.
    pub files: Vec<String>,
}

impl ComponentNeedsResponse {
    /// Create a component description.
    #[must_use]
    pub fn new(component: impl Into<String>, title: Option<String>, files: Vec<String>) -> Self {
        Self {
            component: component.into(),
            title,
            files,
        }
    }

    /// Parse the description out of a decoded frame.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] if the component segment is
    /// missing or empty.
    pub fn from_frame(frame: &Frame) -> Result<Self, PayloadError> {
        expect_event(frame, EventCode::ComponentNeedsResponse)?;
        let text =
            std::str::from_utf8(content_bytes(frame)).map_err(|_| PayloadError::InvalidUtf8)?;

        let mut segments = text.split('\0');
        let component = match segments.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(PayloadError::Malformed("missing component name")),
        };
        let title = match segments.next() {
            Some("") | None => None,
            Some(title) => Some(title.to_string()),
        };
        let files = segments.map(str::to_string).collect();

        Ok(Self {
            component,
            title,
            files,
        })
    }

    /// Serialize to payload bytes plus their exact bit length.
    #[must_use]
    pub fn to_payload(&self) -> (Bytes, u32) {
        let mut buf = BytesMut::new();
        buf.put_slice(self.component.as_bytes());
        buf.put_u8(0);
        buf.put_slice(self.title.as_deref().unwrap_or("").as_bytes());
        for file in &self.files {
            buf.put_u8(0);
            buf.put_slice(file.as_bytes());
        }

        let bits = buf.len() as u32 * 8;
        (buf.freeze(), bits)
    }
}
