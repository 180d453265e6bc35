//! CRC-32 (IEEE 802.3) checksum engine.
//!
//! Table-driven implementation using the reflected polynomial `0xEDB88320`.
//! The 256-entry lookup table is built by const evaluation, so there is no
//! lazily-initialized mutable state anywhere in the engine.
//!
//! This checksum guards a 44-byte signature record against bit corruption;
//! it is an integrity check, not a cryptographic primitive.

/// IEEE 802.3 CRC-32 polynomial (reflected).
const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Precomputed lookup table, generated at compile time.
const CRC32_TABLE: [u32; 256] = generate_table();

const fn generate_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 == 1 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC-32 checksum of `data` in one shot.
///
/// Any byte sequence, including the empty one, is valid input.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFF;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    crc ^ 0xFFFF_FFFF
}
