//! The fixed character-to-fyve symbol table and the operating-code space.
//!
//! The table is a protocol-version-wide bijection between name characters
//! and the 5-bit code-points 1..=30. It is identical on both ends of the
//! wire, never rebuilt at runtime, and never derived from document content.
//! Code-points 0 and 31 are reserved: 0 prefixes every operating code, 31
//! is held back for a future escape scheme.
//!
//! Characters outside the table (anything that is not a lowercase ASCII
//! name character or one of `-`, `_`, `.`, `:`) are carried as UTF-8
//! chains, never through the table.

use crate::error::CodecError;

/// Width of a single fyve in bits.
pub const FYVE_WIDTH: u8 = 5;

/// Width of an operating code (the `00000` prefix plus a second fyve).
pub const OP_WIDTH: u8 = 10;

/// Width of a UTF-8 chain's byte-count field.
pub const CHAIN_LEN_WIDTH: u8 = 10;

/// Largest byte count a UTF-8 chain can declare.
pub const MAX_CHAIN_LEN: usize = (1 << CHAIN_LEN_WIDTH) - 1;

/// The fyve that prefixes every operating code.
pub const OP_PREFIX: u8 = 0b00000;

/// The reserved all-ones fyve; never denotes a character.
pub const RESERVED_FYVE: u8 = 0b11111;

/// Structural operating codes, emitted by the encoder's traversal and
/// consumed by the decoder's state machine. They never appear as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// A length-prefixed raw UTF-8 byte span follows.
    Utf8Chain = 0x00,
    /// A new element begins; its tag name follows.
    StartOfTag = 0x10,
    /// The current element's attribute list begins.
    StartOfAttributes = 0x11,
    /// The current element's children begin.
    StartOfData = 0x18,
    /// The current element is complete.
    EndOfTag = 0x19,
}

impl OpCode {
    /// Map a second fyve-pair value to an operating code, if defined.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(OpCode::Utf8Chain),
            0x10 => Some(OpCode::StartOfTag),
            0x11 => Some(OpCode::StartOfAttributes),
            0x18 => Some(OpCode::StartOfData),
            0x19 => Some(OpCode::EndOfTag),
            _ => None,
        }
    }
}

impl From<OpCode> for u32 {
    fn from(op: OpCode) -> u32 {
        op as u32
    }
}

/// Map a tag or attribute name character to its 5-bit symbol code.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedCharacter`] for characters outside the
/// table's alphabet; those must travel as UTF-8 chains instead.
pub fn encode_symbol(c: char) -> Result<u8, CodecError> {
    match c {
        'a'..='z' => Ok(c as u8 - b'a' + 1),
        '-' => Ok(27),
        '_' => Ok(28),
        '.' => Ok(29),
        ':' => Ok(30),
        _ => Err(CodecError::UnsupportedCharacter(c)),
    }
}

/// Map a 5-bit symbol code back to its character.
///
/// # Errors
///
/// Returns [`CodecError::ReservedCode`] for 0, 31 and any unassigned code.
pub fn decode_symbol(code: u8) -> Result<char, CodecError> {
    match code {
        1..=26 => Ok((b'a' + code - 1) as char),
        27 => Ok('-'),
        28 => Ok('_'),
        29 => Ok('.'),
        30 => Ok(':'),
        _ => Err(CodecError::ReservedCode(code)),
    }
}
