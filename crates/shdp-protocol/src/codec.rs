//! Codec for encoding and decoding SHDP frame envelopes.
//!
//! The codec handles only the envelope: header fields and raw payload
//! bytes. It performs no interpretation of payload contents; that is the
//! markup codec's job for `HTML_FILE_RESPONSE` payloads.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::frames::Frame;

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 7;

/// Smallest payload a valid frame may declare, in bits.
pub const MIN_PAYLOAD_BITS: u32 = 8;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The header declares fewer than 8 payload bits.
    #[error("Frame declares fewer than {MIN_PAYLOAD_BITS} payload bits")]
    ZeroLengthFrame,

    /// Not enough bytes for the header or the declared payload.
    #[error("Incomplete frame: need {0} more bytes")]
    Incomplete(usize),

    /// The payload byte count disagrees with the declared bit length.
    #[error("Payload of {actual} bytes cannot carry {declared_bits} bits")]
    LengthMismatch {
        /// Bit length the caller declared.
        declared_bits: u32,
        /// Payload bytes actually supplied.
        actual: usize,
    },
}

/// Number of payload bytes implied by a declared bit length.
#[must_use]
pub fn payload_len(data_length_bits: u32) -> usize {
    (data_length_bits as usize).div_ceil(8)
}

/// Encode a frame envelope around an opaque payload.
///
/// # Errors
///
/// Returns [`FrameError::ZeroLengthFrame`] if `payload_bits < 8` (a
/// sending-side programming error, surfaced rather than put on the wire)
/// and [`FrameError::LengthMismatch`] if `payload` does not hold exactly
/// `ceil(payload_bits / 8)` bytes.
pub fn encode(
    version: u8,
    event: u16,
    payload: &[u8],
    payload_bits: u32,
) -> Result<Bytes, FrameError> {
    if payload_bits < MIN_PAYLOAD_BITS {
        return Err(FrameError::ZeroLengthFrame);
    }
    if payload.len() != payload_len(payload_bits) {
        return Err(FrameError::LengthMismatch {
            declared_bits: payload_bits,
            actual: payload.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u8(version);
    buf.put_u16(event);
    buf.put_u32(payload_bits);
    buf.put_slice(payload);

    Ok(buf.freeze())
}

/// Encode an already-built [`Frame`].
///
/// # Errors
///
/// See [`encode`].
pub fn encode_frame(frame: &Frame) -> Result<Bytes, FrameError> {
    encode(
        frame.version,
        frame.event,
        &frame.payload,
        frame.data_length_bits,
    )
}

/// Decode a frame envelope from bytes.
///
/// # Errors
///
/// Returns [`FrameError::Incomplete`] if fewer bytes are available than
/// the header, or than the header declares, and
/// [`FrameError::ZeroLengthFrame`] if the declared bit length is zero or
/// under 8 bits; such a frame must never reach a handler.
pub fn decode(data: &[u8]) -> Result<Frame, FrameError> {
    if data.len() < HEADER_SIZE {
        return Err(FrameError::Incomplete(HEADER_SIZE - data.len()));
    }

    let version = data[0];
    let event = u16::from_be_bytes([data[1], data[2]]);
    let data_length_bits = u32::from_be_bytes([data[3], data[4], data[5], data[6]]);

    if data_length_bits < MIN_PAYLOAD_BITS {
        return Err(FrameError::ZeroLengthFrame);
    }

    let total = HEADER_SIZE + payload_len(data_length_bits);
    if data.len() < total {
        return Err(FrameError::Incomplete(total - data.len()));
    }

    Ok(Frame {
        version,
        event,
        data_length_bits,
        payload: Bytes::copy_from_slice(&data[HEADER_SIZE..total]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() {
        let payload = b"component/header";
        let encoded = encode(1, 0x0000, payload, payload.len() as u32 * 8).unwrap();
        let frame = decode(&encoded).unwrap();

        assert_eq!(frame.version, 1);
        assert_eq!(frame.event, 0x0000);
        assert_eq!(frame.data_length_bits, 128);
        assert_eq!(&frame.payload[..], payload);
    }

    #[test]
    fn test_roundtrip_with_pad_bits() {
        // 13 bits of payload occupy two bytes; the declared length must
        // survive unchanged.
        let encoded = encode(1, 0x1234, &[0xab, 0xc0], 13).unwrap();
        let frame = decode(&encoded).unwrap();

        assert_eq!(frame.data_length_bits, 13);
        assert_eq!(frame.payload_len(), 2);
    }

    #[test]
    fn test_literal_hello_world_frame() {
        let mut data = vec![0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x68];
        data.extend_from_slice(b"Hello, World!");

        let frame = decode(&data).unwrap();
        assert_eq!(frame.version, 1);
        assert_eq!(frame.event, 1);
        assert_eq!(frame.data_length_bits, 104);
        assert_eq!(&frame.payload[..], b"Hello, World!");
    }

    #[test]
    fn test_short_header_is_incomplete() {
        assert_eq!(decode(&[1, 0, 1, 0]), Err(FrameError::Incomplete(3)));
    }

    #[test]
    fn test_short_payload_is_incomplete() {
        // Header declares 104 bits (13 bytes) but only 4 follow.
        let mut data = vec![0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x68];
        data.extend_from_slice(b"Hell");
        assert_eq!(decode(&data), Err(FrameError::Incomplete(9)));
    }

    #[test]
    fn test_zero_length_frame_is_rejected() {
        for (version, event) in [(0u8, 0u16), (1, 0x0002), (255, 0xffff)] {
            let mut data = vec![version];
            data.extend_from_slice(&event.to_be_bytes());
            data.extend_from_slice(&0u32.to_be_bytes());

            assert_eq!(decode(&data), Err(FrameError::ZeroLengthFrame));
        }
    }

    #[test]
    fn test_encode_rejects_sub_byte_frames() {
        assert_eq!(encode(1, 0, &[0x80], 7), Err(FrameError::ZeroLengthFrame));
        assert_eq!(encode(1, 0, &[], 0), Err(FrameError::ZeroLengthFrame));
    }

    #[test]
    fn test_encode_rejects_length_mismatch() {
        assert_eq!(
            encode(1, 0, &[1, 2, 3], 8),
            Err(FrameError::LengthMismatch {
                declared_bits: 8,
                actual: 3
            })
        );
    }
}
