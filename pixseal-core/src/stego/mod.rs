//! Steganographic embedder/extractor.
//!
//! Payload bytes are hidden in the low 4 bits of the blue channel, one
//! nibble per pixel, walking each region's pixels in row-major order. The
//! alpha channel is never touched so transparency-aware viewers see no
//! difference, and the visible perturbation stays below ±15 of 255 on a
//! single channel.
//!
//! Records are zero-padded from 48 bytes to the region's 64-byte capacity
//! before embedding, so trailing region pixels decode to a constant zero
//! nibble pattern instead of leftover image noise.

pub mod regions;

use crate::record::RECORD_LEN;
use regions::Region;

/// RGBA channel index carrying the payload nibbles (blue).
pub const CARRIER_CHANNEL: usize = 2;

/// Bytes per pixel in the caller-supplied buffer.
const BYTES_PER_PIXEL: usize = 4;

/// Byte offset of the carrier channel for pixel (x, y), or `None` when the
/// coordinate is outside the image.
fn carrier_offset(x: u32, y: u32, width: u32, height: u32) -> Option<usize> {
    if x >= width || y >= height {
        return None;
    }
    Some((y as usize * width as usize + x as usize) * BYTES_PER_PIXEL + CARRIER_CHANNEL)
}

/// Embed a packed record into one region of the pixel buffer.
///
/// The record is zero-padded to the region's byte capacity; pixels outside
/// the image bounds are skipped rather than written (the nibble cursor still
/// advances, keeping embed and extract symmetric).
pub(crate) fn embed_record(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    region: &Region,
    record: &[u8; RECORD_LEN],
) {
    let mut padded = vec![0u8; region.capacity_bytes()];
    padded[..RECORD_LEN].copy_from_slice(record);

    let (ox, oy) = region.origin(width, height);
    for pixel_idx in 0..region.pixel_count() {
        let x = ox + pixel_idx % region.width;
        let y = oy + pixel_idx / region.width;

        let byte = padded[(pixel_idx / 2) as usize];
        let nibble = if pixel_idx % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0F
        };

        if let Some(offset) = carrier_offset(x, y, width, height) {
            pixels[offset] = (pixels[offset] & 0xF0) | nibble;
        }
    }
}

/// Extract one region's byte run from the pixel buffer.
///
/// The inverse of [`embed_record`]: reads the low nibble of the carrier
/// channel for each region pixel in row-major order and reassembles nibble
/// pairs into bytes. Never mutates the buffer; out-of-bounds pixels decode
/// as zero nibbles, mirroring the embed-side skip.
pub(crate) fn extract_candidate(
    pixels: &[u8],
    width: u32,
    height: u32,
    region: &Region,
) -> Vec<u8> {
    let mut out = vec![0u8; region.capacity_bytes()];

    let (ox, oy) = region.origin(width, height);
    for pixel_idx in 0..region.pixel_count() {
        let x = ox + pixel_idx % region.width;
        let y = oy + pixel_idx / region.width;

        let nibble = match carrier_offset(x, y, width, height) {
            Some(offset) => pixels[offset] & 0x0F,
            None => 0,
        };

        let byte = &mut out[(pixel_idx / 2) as usize];
        if pixel_idx % 2 == 0 {
            *byte |= nibble << 4;
        } else {
            *byte |= nibble;
        }
    }

    out
}
