//! The `HTML_FILE_RESPONSE` payload layout.
//!
//! A payload is `[filename bytes] 0x00 [fyve/byte stream]`. The filename
//! and separator occupy whole bytes; the document stream's exact bit
//! length is the frame's declared bit length minus those header bits.

use bytes::{BufMut, BytesMut};

use crate::bits::FyveStream;
use crate::decoder::decode_document;
use crate::encoder::encode_document;
use crate::error::CodecError;
use crate::tree::Document;

/// Assemble a full `HTML_FILE_RESPONSE` payload from a filename and an
/// already-encoded document stream.
///
/// # Errors
///
/// Returns [`CodecError::MalformedStream`] if the filename is empty or
/// contains a NUL byte, since NUL is the separator.
pub fn encode_html_payload(filename: &str, stream: &FyveStream) -> Result<FyveStream, CodecError> {
    if filename.is_empty() {
        return Err(CodecError::MalformedStream("empty filename"));
    }
    if filename.as_bytes().contains(&0) {
        return Err(CodecError::MalformedStream("filename contains a NUL byte"));
    }

    let mut buf = BytesMut::with_capacity(filename.len() + 1 + stream.as_bytes().len());
    buf.put_slice(filename.as_bytes());
    buf.put_u8(0);
    buf.put_slice(stream.as_bytes());

    let bit_len = (filename.len() + 1) * 8 + stream.bit_len();
    FyveStream::new(buf.freeze(), bit_len)
}

/// Split an `HTML_FILE_RESPONSE` payload into its filename and the
/// document stream that follows the separator.
///
/// # Errors
///
/// Returns [`CodecError::MalformedStream`] if no separator byte exists,
/// the filename is empty or not UTF-8, or the declared bit length does
/// not cover the filename and separator.
pub fn decode_html_payload(payload: &FyveStream) -> Result<(String, FyveStream), CodecError> {
    let bytes = payload.as_bytes();
    let sep = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::MalformedStream("missing filename separator"))?;
    if sep == 0 {
        return Err(CodecError::MalformedStream("empty filename"));
    }

    let filename = std::str::from_utf8(&bytes[..sep])
        .map_err(|_| CodecError::MalformedStream("filename is not valid utf-8"))?
        .to_string();

    let header_bits = (sep + 1) * 8;
    let stream_bits = payload
        .bit_len()
        .checked_sub(header_bits)
        .ok_or(CodecError::MalformedStream("bit length shorter than filename"))?;

    let stream = FyveStream::new(bytes[sep + 1..].to_vec(), stream_bits)?;
    Ok((filename, stream))
}

/// Encode a document under a filename into a ready-to-frame payload.
///
/// # Errors
///
/// Propagates [`encode_document`] and [`encode_html_payload`] errors.
pub fn encode_html_file(filename: &str, document: &Document) -> Result<FyveStream, CodecError> {
    let stream = encode_document(document)?;
    encode_html_payload(filename, &stream)
}

/// Decode a framed payload into its filename and document.
///
/// # Errors
///
/// Propagates [`decode_html_payload`] and [`decode_document`] errors.
pub fn decode_html_file(payload: &FyveStream) -> Result<(String, Document), CodecError> {
    let (filename, stream) = decode_html_payload(payload)?;
    let document = decode_document(&stream)?;
    Ok((filename, document))
}
