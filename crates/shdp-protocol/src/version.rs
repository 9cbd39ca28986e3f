//! Protocol versioning for SHDP.

/// Current protocol version, carried in every frame header.
pub const PROTOCOL_VERSION: u8 = 1;

/// Check whether a frame's version is one this implementation speaks.
///
/// Frame decoding itself never rejects an unknown version; what to do with
/// one is the event router's decision.
#[must_use]
pub fn is_supported(version: u8) -> bool {
    version == PROTOCOL_VERSION
}
