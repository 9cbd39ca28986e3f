//! Bit-level reader and writer for fyve streams.
//!
//! Everything narrower than a byte in SHDP (5-bit symbols, 10-bit operating
//! codes and chain lengths) goes through this module, so all sub-byte
//! arithmetic lives in one place and the encoder and decoder stay symmetric.
//! Values are packed most-significant-bit first.

use bytes::Bytes;

use crate::error::CodecError;

/// Widest single field the writer and reader accept, in bits.
pub const MAX_FIELD_WIDTH: u8 = 32;

/// An owned bit stream: packed bytes plus the exact payload bit count.
///
/// The final byte may contain up to 7 trailing pad bits; those are always
/// zero and are excluded from [`FyveStream::bit_len`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FyveStream {
    bytes: Bytes,
    bit_len: usize,
}

impl FyveStream {
    /// Create a stream from packed bytes and an exact bit count.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedStream`] if the byte count does not
    /// match `ceil(bit_len / 8)`.
    pub fn new(bytes: impl Into<Bytes>, bit_len: usize) -> Result<Self, CodecError> {
        let bytes = bytes.into();
        if bytes.len() != bit_len.div_ceil(8) {
            return Err(CodecError::MalformedStream(
                "byte count disagrees with declared bit length",
            ));
        }
        Ok(Self { bytes, bit_len })
    }

    /// Exact number of payload bits, pad excluded.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// The packed bytes, including any trailing pad bits.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the stream, returning its packed bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Whether the stream holds no payload bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }
}

/// Accumulates values of arbitrary bit width into a byte buffer.
#[derive(Debug, Default, PartialEq)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits written so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append the low `width` bits of `value`, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WidthOutOfRange`] for widths outside 1..=32.
    pub fn write(&mut self, value: u32, width: u8) -> Result<&mut Self, CodecError> {
        if width == 0 || width > MAX_FIELD_WIDTH {
            return Err(CodecError::WidthOutOfRange(width));
        }

        for i in (0..width).rev() {
            let bit = (value >> i) & 1 == 1;
            if self.bit_len % 8 == 0 {
                self.buf.push(0);
            }
            if bit {
                let last = self.buf.len() - 1;
                self.buf[last] |= 1 << (7 - self.bit_len % 8);
            }
            self.bit_len += 1;
        }

        Ok(self)
    }

    /// Append raw bytes at byte granularity (8 bits each, not fyve-packed).
    ///
    /// # Errors
    ///
    /// See [`BitWriter::write`].
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CodecError> {
        for &byte in bytes {
            self.write(u32::from(byte), 8)?;
        }
        Ok(self)
    }

    /// Flush the writer, padding with zero bits to the next byte boundary.
    ///
    /// The pad bit count (0..=7) is never part of the reported bit length.
    #[must_use]
    pub fn finish(self) -> FyveStream {
        // write() already zero-fills partial bytes, so no explicit pad pass.
        FyveStream {
            bytes: Bytes::from(self.buf),
            bit_len: self.bit_len,
        }
    }
}

/// Consumes values of requested bit width from a packed byte buffer.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    bit_len: usize,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over a fyve stream.
    #[must_use]
    pub fn new(stream: &'a FyveStream) -> Self {
        Self {
            bytes: stream.as_bytes(),
            bit_len: stream.bit_len(),
            pos: 0,
        }
    }

    /// Current bit cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bits left before the stream is exhausted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bit_len - self.pos
    }

    /// Read `width` bits, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfBits`] if fewer than `width` bits remain
    /// and [`CodecError::WidthOutOfRange`] for widths outside 1..=32.
    pub fn read(&mut self, width: u8) -> Result<u32, CodecError> {
        if width == 0 || width > MAX_FIELD_WIDTH {
            return Err(CodecError::WidthOutOfRange(width));
        }
        if usize::from(width) > self.remaining() {
            return Err(CodecError::OutOfBits {
                requested: usize::from(width),
                remaining: self.remaining(),
            });
        }

        let mut value = 0u32;
        for _ in 0..width {
            let bit = (self.bytes[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            self.pos += 1;
        }

        Ok(value)
    }
}
