//! Event routing for decoded SHDP frames.
//!
//! The router owns no transport: it is handed the bytes of one inbound
//! frame at a time and returns the bytes of the frames to send back.
//! Every outbound frame answers the specific inbound frame that produced
//! it; there is no unsolicited-push path.
//!
//! The two sides apply different failure policies, per the protocol's
//! side-channel rule: a server answers a malformed or zero-length frame
//! with an `ERROR_RESPONSE` instead of dropping it or tearing down the
//! connection; a client discards such a frame without ever delivering it
//! to a handler.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, warn};

use bytes::Bytes;
use shdp_codec::{CodecError, FyveStream};
use shdp_protocol::{codec, EventCode, Frame, FrameError, PROTOCOL_VERSION};

use crate::events::{ErrorResponse, PayloadError};

/// Which side of the connection this router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Answers requests; failures become `ERROR_RESPONSE` replies.
    Server,
    /// Consumes responses; failures discard the frame.
    Client,
}

/// Errors surfaced while dispatching one inbound frame.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The frame envelope could not be decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The markup payload could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A typed event payload could not be parsed.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// No handler is registered for the frame's version and event.
    #[error("No handler for event 0x{event:04x} (version {version})")]
    UnknownEvent {
        /// Version from the frame header.
        version: u8,
        /// Event code from the frame header.
        event: u16,
    },

    /// A handler failed for an application-specific reason.
    #[error("Handler error: {0}")]
    Handler(String),
}

impl DispatchError {
    /// Numeric code carried by the resulting `ERROR_RESPONSE`.
    #[must_use]
    pub fn error_code(&self) -> u16 {
        match self {
            DispatchError::Frame(_) | DispatchError::Codec(_) | DispatchError::Payload(_) => 400,
            DispatchError::UnknownEvent { .. } => 404,
            DispatchError::Handler(_) => 500,
        }
    }
}

/// One event to send in reply to an inbound frame.
#[derive(Debug, Clone)]
pub struct OutboundEvent {
    /// Event code of the reply frame.
    pub event: u16,
    /// Payload bytes.
    pub payload: Bytes,
    /// Exact payload bit length, pad excluded.
    pub payload_bits: u32,
}

impl OutboundEvent {
    /// Build a reply from whole payload bytes.
    #[must_use]
    pub fn new(event: u16, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let payload_bits = payload.len() as u32 * 8;
        Self {
            event,
            payload,
            payload_bits,
        }
    }

    /// Build a reply from a fyve stream, preserving its exact bit length.
    #[must_use]
    pub fn from_stream(event: u16, stream: FyveStream) -> Self {
        let payload_bits = stream.bit_len() as u32;
        Self {
            event,
            payload: stream.into_bytes(),
            payload_bits,
        }
    }
}

/// An application handler for one `(version, event)` pair.
pub trait EventHandler: Send + Sync {
    /// Answer a decoded frame with zero or more reply events.
    ///
    /// # Errors
    ///
    /// Any error aborts this dispatch only; the router turns it into an
    /// `ERROR_RESPONSE` (server) or a discard (client).
    fn handle(&self, frame: &Frame) -> Result<Vec<OutboundEvent>, DispatchError>;
}

impl<F> EventHandler for F
where
    F: Fn(&Frame) -> Result<Vec<OutboundEvent>, DispatchError> + Send + Sync,
{
    fn handle(&self, frame: &Frame) -> Result<Vec<OutboundEvent>, DispatchError> {
        self(frame)
    }
}

/// Dispatches inbound frames to registered handlers.
///
/// The handler table is a [`DashMap`], so concurrent dispatch over
/// independent frames needs no external locking; the codec underneath is
/// pure and shares only the immutable symbol table.
pub struct Router {
    handlers: DashMap<(u8, u16), Arc<dyn EventHandler>>,
    role: Role,
}

impl Router {
    /// Create a router for one side of the connection.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            handlers: DashMap::new(),
            role,
        }
    }

    /// Register a handler for a `(version, event)` pair, replacing any
    /// previous registration.
    pub fn register(&self, version: u8, event: u16, handler: Arc<dyn EventHandler>) {
        self.handlers.insert((version, event), handler);
    }

    /// Whether a handler exists for a `(version, event)` pair.
    #[must_use]
    pub fn has_handler(&self, version: u8, event: u16) -> bool {
        self.handlers.contains_key(&(version, event))
    }

    /// Dispatch one inbound frame's bytes, returning the reply frames.
    ///
    /// An empty result means either a handler chose not to reply or the
    /// frame was discarded under the client policy.
    pub fn dispatch(&self, data: &[u8]) -> Vec<Bytes> {
        let frame = match codec::decode(data) {
            Ok(frame) => frame,
            Err(err) => return self.failure(PROTOCOL_VERSION, err.into()),
        };

        debug!(
            version = frame.version,
            event = format_args!("0x{:04x}", frame.event),
            bits = frame.data_length_bits,
            "dispatching frame"
        );

        let handler = match self.handlers.get(&(frame.version, frame.event)) {
            Some(handler) => Arc::clone(&handler),
            None => {
                let err = DispatchError::UnknownEvent {
                    version: frame.version,
                    event: frame.event,
                };
                return self.failure(frame.version, err);
            }
        };

        let outbound = match handler.handle(&frame) {
            Ok(outbound) => outbound,
            Err(err) => return self.failure(frame.version, err),
        };

        let mut replies = Vec::with_capacity(outbound.len());
        for out in outbound {
            match codec::encode(frame.version, out.event, &out.payload, out.payload_bits) {
                Ok(bytes) => replies.push(bytes),
                Err(err) => return self.failure(frame.version, err.into()),
            }
        }
        replies
    }

    fn failure(&self, version: u8, err: DispatchError) -> Vec<Bytes> {
        match self.role {
            Role::Server => {
                warn!(error = %err, "answering failed dispatch with error response");
                let response = ErrorResponse::new(err.error_code(), err.to_string());
                let (payload, bits) = response.to_payload();
                match codec::encode(version, EventCode::ErrorResponse.into(), &payload, bits) {
                    Ok(bytes) => vec![bytes],
                    // The error payload is never under 8 bits, so this arm
                    // is unreachable; stay silent rather than panic.
                    Err(encode_err) => {
                        warn!(error = %encode_err, "failed to encode error response");
                        Vec::new()
                    }
                }
            }
            Role::Client => {
                warn!(error = %err, "discarding undeliverable frame");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ComponentNeedsRequest, ComponentNeedsResponse};
    use shdp_codec::{decode_html_file, encode_html_file, Document, Node};

    fn zero_length_frame() -> Vec<u8> {
        let mut data = vec![PROTOCOL_VERSION, 0x00, 0x00];
        data.extend_from_slice(&0u32.to_be_bytes());
        data
    }

    #[test]
    fn test_server_answers_zero_length_with_error_response() {
        let router = Router::new(Role::Server);
        let replies = router.dispatch(&zero_length_frame());

        assert_eq!(replies.len(), 1);
        let frame = codec::decode(&replies[0]).unwrap();
        assert_eq!(frame.event_code(), Some(EventCode::ErrorResponse));

        let error = ErrorResponse::from_frame(&frame).unwrap();
        assert_eq!(error.code, 400);
    }

    #[test]
    fn test_client_discards_zero_length_frame() {
        let router = Router::new(Role::Client);
        assert!(router.dispatch(&zero_length_frame()).is_empty());
    }

    #[test]
    fn test_server_answers_unknown_event_with_not_found() {
        let router = Router::new(Role::Server);
        let request = codec::encode(PROTOCOL_VERSION, 0x0042, b"data", 32).unwrap();

        let replies = router.dispatch(&request);
        assert_eq!(replies.len(), 1);

        let frame = codec::decode(&replies[0]).unwrap();
        let error = ErrorResponse::from_frame(&frame).unwrap();
        assert_eq!(error.code, 404);
    }

    #[test]
    fn test_client_never_delivers_undecodable_frames() {
        let router = Router::new(Role::Client);
        router.register(
            PROTOCOL_VERSION,
            0x0001,
            Arc::new(|_: &Frame| -> Result<Vec<OutboundEvent>, DispatchError> {
                panic!("handler must not see an invalid frame");
            }),
        );

        assert!(router.dispatch(&zero_length_frame()).is_empty());
        assert!(router.dispatch(&[0x01, 0x00]).is_empty());
    }

    #[test]
    fn test_component_request_is_answered_with_markup() {
        let router = Router::new(Role::Server);
        router.register(
            PROTOCOL_VERSION,
            EventCode::ComponentNeedsRequest.into(),
            Arc::new(|frame: &Frame| -> Result<Vec<OutboundEvent>, DispatchError> {
                let request = ComponentNeedsRequest::from_frame(frame)?;
                let document = Document::new().with(
                    Node::new("p")
                        .with_attribute("class", "hello")
                        .with_text("Hello, World!"),
                );

                let describe = ComponentNeedsResponse::new(
                    request.component.clone(),
                    Some("Hello".to_string()),
                    vec!["hello.html".to_string()],
                );
                let (payload, bits) = describe.to_payload();

                let stream = encode_html_file("hello.html", &document)?;
                Ok(vec![
                    OutboundEvent {
                        event: EventCode::ComponentNeedsResponse.into(),
                        payload,
                        payload_bits: bits,
                    },
                    OutboundEvent::from_stream(EventCode::HtmlFileResponse.into(), stream),
                ])
            }),
        );

        let (payload, bits) = ComponentNeedsRequest::new("hello").to_payload();
        let request = codec::encode(
            PROTOCOL_VERSION,
            EventCode::ComponentNeedsRequest.into(),
            &payload,
            bits,
        )
        .unwrap();

        let replies = router.dispatch(&request);
        assert_eq!(replies.len(), 2);

        let describe = codec::decode(&replies[0]).unwrap();
        assert_eq!(describe.event_code(), Some(EventCode::ComponentNeedsResponse));

        let html = codec::decode(&replies[1]).unwrap();
        assert_eq!(html.event_code(), Some(EventCode::HtmlFileResponse));

        let stream = shdp_codec::FyveStream::new(
            html.payload.clone(),
            html.data_length_bits as usize,
        )
        .unwrap();
        let (filename, document) = decode_html_file(&stream).unwrap();
        assert_eq!(filename, "hello.html");
        assert_eq!(
            document.roots()[0].attribute("class"),
            Some("hello")
        );
    }

    #[test]
    fn test_handler_error_becomes_error_response() {
        let router = Router::new(Role::Server);
        router.register(
            PROTOCOL_VERSION,
            0x0000,
            Arc::new(|_: &Frame| -> Result<Vec<OutboundEvent>, DispatchError> {
                Err(DispatchError::Handler("backend unavailable".into()))
            }),
        );

        let request = codec::encode(PROTOCOL_VERSION, 0x0000, b"name", 32).unwrap();
        let replies = router.dispatch(&request);

        let frame = codec::decode(&replies[0]).unwrap();
        let error = ErrorResponse::from_frame(&frame).unwrap();
        assert_eq!(error.code, 500);
        assert!(error.message.contains("backend unavailable"));
    }
}
