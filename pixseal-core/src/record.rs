//! Signature record codec.
//!
//! A signature record is a fixed 48-byte block with big-endian multi-byte
//! fields:
//!
//! ```text
//! [ 0..6 ]  marker "PXSEAL"
//! [ 6    ]  format version (2)
//! [ 7    ]  region id (0, 1, 2)
//! [ 8..24]  truncated SHA-256 of the metadata payload
//! [24..40]  truncated SHA-256 of the pixel bytes at signing time
//! [40..44]  unix seconds, u32 big-endian
//! [44..48]  CRC-32 over bytes [0, 44)
//! ```
//!
//! Unpacking fails closed: a candidate without the marker is "not a
//! signature" (`None`), while a marker match with a bad checksum is a
//! present-but-corrupted record; the two cases are never conflated.

use serde::{Deserialize, Serialize};

use crate::checksum::crc32;
use crate::hashing::TRUNCATED_DIGEST_LEN;
use crate::stego::regions::RegionId;

/// Marker identifying a v2 signature record.
pub const MARKER: &[u8; 6] = b"PXSEAL";

/// Current record format version.
pub const FORMAT_VERSION: u8 = 2;

/// Total packed record length in bytes.
pub const RECORD_LEN: usize = 48;

/// Marker of the retired v1 single-region layout, recognized read-only.
/// Deliberately not a superset of [`MARKER`] so the two never false-match.
pub const LEGACY_MARKER: &[u8; 8] = b"PIXSEAL1";

/// The checksum always covers exactly the bytes preceding it.
const CHECKSUM_SPAN: usize = RECORD_LEN - 4;

/// The payload of one embedded signature copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Which of the three regions this copy was embedded at.
    pub region: RegionId,
    /// First 16 bytes of SHA-256 over the serialized metadata payload.
    pub metadata_digest: [u8; TRUNCATED_DIGEST_LEN],
    /// First 16 bytes of SHA-256 over the pre-embedding pixel bytes.
    pub content_digest: [u8; TRUNCATED_DIGEST_LEN],
    /// Unix seconds at signing time.
    pub timestamp: u32,
}

/// A record pulled back out of pixel data, before classification.
///
/// Carries both the stored and the independently recomputed checksum so the
/// caller can distinguish a corrupted signature from an absent one. The
/// region byte is kept raw: a marker-matched candidate with a mangled region
/// byte is still "present", just not valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackedRecord {
    /// Format version byte (2, or 1 for legacy records).
    pub version: u8,
    /// Region id byte as stored; may not map to a known region if corrupted.
    pub region_byte: u8,
    pub metadata_digest: [u8; TRUNCATED_DIGEST_LEN],
    pub content_digest: [u8; TRUNCATED_DIGEST_LEN],
    pub timestamp: u32,
    pub stored_checksum: u32,
    pub computed_checksum: u32,
}

impl UnpackedRecord {
    /// Whether the stored checksum matches the recomputed one.
    pub fn is_intact(&self) -> bool {
        self.stored_checksum == self.computed_checksum
    }

    /// Convert into a typed record; `None` if the region byte is unknown.
    pub fn to_record(&self) -> Option<SignatureRecord> {
        Some(SignatureRecord {
            region: RegionId::from_u8(self.region_byte)?,
            metadata_digest: self.metadata_digest,
            content_digest: self.content_digest,
            timestamp: self.timestamp,
        })
    }
}

/// Pack a signature record into its 48-byte wire form.
///
/// The checksum is computed last, over exactly the first 44 bytes.
pub fn pack(record: &SignatureRecord) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[0..6].copy_from_slice(MARKER);
    buf[6] = FORMAT_VERSION;
    buf[7] = record.region.as_u8();
    buf[8..24].copy_from_slice(&record.metadata_digest);
    buf[24..40].copy_from_slice(&record.content_digest);
    buf[40..44].copy_from_slice(&record.timestamp.to_be_bytes());

    let checksum = crc32(&buf[..CHECKSUM_SPAN]);
    buf[44..48].copy_from_slice(&checksum.to_be_bytes());
    buf
}

/// Unpack a candidate byte run as a v2 record.
///
/// Returns `None` when the candidate is shorter than 48 bytes or the marker
/// does not match; those are "no signature here", not errors. A marker
/// match always yields `Some`, even with a failing checksum; classification
/// is the caller's job via [`UnpackedRecord::is_intact`].
pub fn unpack(candidate: &[u8]) -> Option<UnpackedRecord> {
    if candidate.len() < RECORD_LEN || &candidate[0..6] != MARKER {
        return None;
    }

    Some(unpack_fields(candidate, candidate[6], candidate[7]))
}

/// Unpack a candidate as a retired v1 record (8-byte marker, no region id).
///
/// v1 embedded a single copy at the top-left region; new signing never
/// writes this layout.
pub fn unpack_legacy(candidate: &[u8]) -> Option<UnpackedRecord> {
    if candidate.len() < RECORD_LEN || &candidate[0..8] != LEGACY_MARKER {
        return None;
    }

    Some(unpack_fields(candidate, 1, RegionId::TopLeft.as_u8()))
}

/// Shared field extraction; v1 and v2 lay out digests, timestamp, and
/// checksum at the same offsets.
fn unpack_fields(candidate: &[u8], version: u8, region_byte: u8) -> UnpackedRecord {
    let mut metadata_digest = [0u8; TRUNCATED_DIGEST_LEN];
    metadata_digest.copy_from_slice(&candidate[8..24]);
    let mut content_digest = [0u8; TRUNCATED_DIGEST_LEN];
    content_digest.copy_from_slice(&candidate[24..40]);

    let timestamp = u32::from_be_bytes([candidate[40], candidate[41], candidate[42], candidate[43]]);
    let stored_checksum =
        u32::from_be_bytes([candidate[44], candidate[45], candidate[46], candidate[47]]);
    let computed_checksum = crc32(&candidate[..CHECKSUM_SPAN]);

    UnpackedRecord {
        version,
        region_byte,
        metadata_digest,
        content_digest,
        timestamp,
        stored_checksum,
        computed_checksum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SignatureRecord {
        SignatureRecord {
            region: RegionId::TopRight,
            metadata_digest: [0x11; 16],
            content_digest: [0x22; 16],
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_pack_layout() {
        let packed = pack(&sample_record());
        assert_eq!(&packed[0..6], MARKER);
        assert_eq!(packed[6], FORMAT_VERSION);
        assert_eq!(packed[7], 1);
        assert_eq!(&packed[8..24], &[0x11; 16]);
        assert_eq!(&packed[24..40], &[0x22; 16]);
        assert_eq!(&packed[40..44], &1_700_000_000u32.to_be_bytes());
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let record = sample_record();
        let unpacked = unpack(&pack(&record)).expect("marker should match");
        assert!(unpacked.is_intact());
        assert_eq!(unpacked.version, FORMAT_VERSION);
        assert_eq!(unpacked.to_record(), Some(record));
    }

    #[test]
    fn test_unpack_too_short_is_none() {
        let packed = pack(&sample_record());
        assert!(unpack(&packed[..RECORD_LEN - 1]).is_none());
        assert!(unpack(&[]).is_none());
    }

    #[test]
    fn test_unpack_wrong_marker_is_none() {
        let mut packed = pack(&sample_record());
        packed[0] = b'Q';
        assert!(unpack(&packed).is_none());
    }

    #[test]
    fn test_unpack_trailing_padding_ignored() {
        let mut padded = vec![0u8; 64];
        padded[..RECORD_LEN].copy_from_slice(&pack(&sample_record()));
        let unpacked = unpack(&padded).expect("padded candidate should unpack");
        assert!(unpacked.is_intact());
    }

    #[test]
    fn test_bit_flip_detected_as_corruption() {
        let packed = pack(&sample_record());
        // Flip one bit in every covered byte position after the marker; each
        // must be classified as present-but-corrupted, never as absent.
        for byte_idx in 8..44 {
            let mut tampered = packed;
            tampered[byte_idx] ^= 0x01;
            let unpacked = unpack(&tampered).expect("marker still matches");
            assert!(!unpacked.is_intact(), "flip at byte {byte_idx} undetected");
        }
    }

    #[test]
    fn test_tampered_checksum_field_detected() {
        let mut packed = pack(&sample_record());
        packed[45] ^= 0x10;
        let unpacked = unpack(&packed).unwrap();
        assert!(!unpacked.is_intact());
    }

    #[test]
    fn test_mangled_region_byte_stays_present() {
        let mut packed = pack(&sample_record());
        packed[7] = 7;
        let unpacked = unpack(&packed).expect("marker still matches");
        assert!(!unpacked.is_intact());
        assert_eq!(unpacked.to_record(), None);
    }

    #[test]
    fn test_legacy_unpack() {
        let mut buf = [0u8; RECORD_LEN];
        buf[0..8].copy_from_slice(LEGACY_MARKER);
        buf[8..24].copy_from_slice(&[0x33; 16]);
        buf[24..40].copy_from_slice(&[0x44; 16]);
        buf[40..44].copy_from_slice(&1_600_000_000u32.to_be_bytes());
        let checksum = crc32(&buf[..44]);
        buf[44..48].copy_from_slice(&checksum.to_be_bytes());

        let unpacked = unpack_legacy(&buf).expect("legacy marker should match");
        assert!(unpacked.is_intact());
        assert_eq!(unpacked.version, 1);
        assert_eq!(unpacked.timestamp, 1_600_000_000);
        assert_eq!(
            unpacked.to_record().unwrap().region,
            RegionId::TopLeft
        );

        // A v2 unpack must not claim a legacy record.
        assert!(unpack(&buf).is_none());
    }
}
