//! Mixed-endian on-disk GUID decoding
//!
//! GPT stores GUIDs in the historical Microsoft layout: the time_low,
//! time_mid and time_hi_and_version fields are little-endian on disk but the
//! canonical text form reads them as big-endian; the clock-sequence and node
//! bytes are unaffected. Decoding extracts each field at its fixed
//! sub-offset explicitly rather than reinterpreting memory in place.

use uuid::Uuid;

/// Decode a 16-byte on-disk GUID into its canonical UUID value.
///
/// Pure and deterministic; applied identically to the GPT header's disk GUID
/// and to each partition entry's type and unique-ID GUIDs.
pub fn from_mixed_endian(raw: &[u8; 16]) -> Uuid {
    let time_low = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    let time_mid = u16::from_le_bytes([raw[4], raw[5]]);
    let time_hi_and_version = u16::from_le_bytes([raw[6], raw[7]]);
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&raw[8..16]);

    Uuid::from_fields(time_low, time_mid, time_hi_and_version, &tail)
}
