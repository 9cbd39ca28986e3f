//! Error types for the markup codec.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a fyve stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A read requested more bits than the stream holds.
    #[error("Out of bits: requested {requested}, {remaining} remaining")]
    OutOfBits {
        /// Number of bits requested.
        requested: usize,
        /// Number of bits left in the stream.
        remaining: usize,
    },

    /// A field width outside the supported 1..=32 range was requested.
    #[error("Field width {0} is outside the supported 1..=32 range")]
    WidthOutOfRange(u8),

    /// A tag or attribute name character has no symbol code.
    #[error("Character {0:?} is not in the symbol table")]
    UnsupportedCharacter(char),

    /// A symbol code that is reserved or has no character assigned.
    #[error("Symbol code {0} is reserved or unassigned")]
    ReservedCode(u8),

    /// A UTF-8 chain longer than the 10-bit length field can carry.
    #[error("UTF-8 chain of {0} bytes exceeds the {max}-byte limit", max = crate::symbols::MAX_CHAIN_LEN)]
    OversizedChain(usize),

    /// A UTF-8 chain declared more bytes than the stream holds.
    #[error("Truncated chain: declared {declared} bytes, {remaining_bits} bits remaining")]
    TruncatedChain {
        /// Byte count declared by the chain's length field.
        declared: usize,
        /// Bits actually left in the stream.
        remaining_bits: usize,
    },

    /// An operating or character code that is undefined for the decoder's
    /// current state, or a structurally impossible stream.
    #[error("Malformed stream: {0}")]
    MalformedStream(&'static str),
}
