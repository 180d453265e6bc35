//! Sign and verify entry points.
//!
//! Signing digests the metadata payload and the pre-embedding pixel bytes,
//! packs one record per region, and embeds each copy in place. Verification
//! runs the inverse and folds the per-region outcomes through the
//! [`verify`](crate::verify) policy. Both operate on caller-owned buffers
//! and keep no state across calls.

use tracing::debug;

use crate::error::{PixsealError, Result};
use crate::hashing::{self, DIGEST_LEN, TRUNCATED_DIGEST_LEN};
use crate::metadata::SealMetadata;
use crate::record::{self, SignatureRecord, RECORD_LEN};
use crate::stego::regions::{
    RegionId, MIN_SIGNABLE_HEIGHT, MIN_SIGNABLE_WIDTH, REGIONS,
};
use crate::stego::{embed_record, extract_candidate};
use crate::verify::{aggregate, RegionOutcome, RegionReport, VerificationReport};

/// The outcome of a successful sign call.
///
/// Carries both the 16-byte truncated digests that were embedded and the
/// full 32-byte digests for the caller to persist out-of-band (e.g. in a
/// sidecar record); full-length comparison is strictly stronger when the
/// original metadata blob is available.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SignResult {
    /// Regions that were actually written, in embedding order.
    pub regions_signed: Vec<RegionId>,
    /// Truncated metadata digest as embedded.
    pub metadata_digest: [u8; TRUNCATED_DIGEST_LEN],
    /// Truncated content digest as embedded.
    pub content_digest: [u8; TRUNCATED_DIGEST_LEN],
    /// Full SHA-256 of the serialized metadata payload.
    pub metadata_digest_full: [u8; DIGEST_LEN],
    /// Full SHA-256 of the pixel bytes before embedding.
    pub content_digest_full: [u8; DIGEST_LEN],
    /// Unix seconds shared by every embedded record.
    pub timestamp: u32,
}

impl SignResult {
    pub fn metadata_digest_hex(&self) -> String {
        hex::encode(self.metadata_digest)
    }

    pub fn content_digest_hex(&self) -> String {
        hex::encode(self.content_digest)
    }
}

/// Check the buffer length against the stated dimensions.
fn check_buffer(pixels: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .unwrap_or(usize::MAX);
    if pixels.len() != expected {
        return Err(PixsealError::BufferSizeMismatch {
            actual: pixels.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// Sign an RGBA pixel buffer in place with an explicit timestamp.
///
/// Computes the content digest over the buffer as supplied (pre-embedding),
/// then embeds one signature record per region. Preconditions (buffer
/// length and minimum image size) are checked before any pixel mutation.
/// A region that does not fit the image is skipped; the call succeeds as
/// long as at least one region was written, and `regions_signed` reports
/// exactly which.
pub fn sign_image_at<M: SealMetadata + ?Sized>(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    metadata: &M,
    timestamp: u32,
) -> Result<SignResult> {
    check_buffer(pixels, width, height)?;
    if width < MIN_SIGNABLE_WIDTH || height < MIN_SIGNABLE_HEIGHT {
        return Err(PixsealError::ImageTooSmall {
            width,
            height,
            min_width: MIN_SIGNABLE_WIDTH,
            min_height: MIN_SIGNABLE_HEIGHT,
        });
    }

    let metadata_bytes = metadata.to_signing_bytes()?;
    let metadata_digest_full = hashing::digest(&metadata_bytes);
    let content_digest_full = hashing::digest(pixels);

    let mut metadata_digest = [0u8; TRUNCATED_DIGEST_LEN];
    metadata_digest.copy_from_slice(&metadata_digest_full[..TRUNCATED_DIGEST_LEN]);
    let mut content_digest = [0u8; TRUNCATED_DIGEST_LEN];
    content_digest.copy_from_slice(&content_digest_full[..TRUNCATED_DIGEST_LEN]);

    let mut regions_signed = Vec::with_capacity(REGIONS.len());
    for region in &REGIONS {
        if !region.fits(width, height) {
            debug!(region = %region.id, width, height, "region does not fit, skipping");
            continue;
        }

        let packed = record::pack(&SignatureRecord {
            region: region.id,
            metadata_digest,
            content_digest,
            timestamp,
        });
        embed_record(pixels, width, height, region, &packed);
        debug!(region = %region.id, "embedded signature record");
        regions_signed.push(region.id);
    }

    if regions_signed.is_empty() {
        return Err(PixsealError::NoRegionSigned { width, height });
    }

    Ok(SignResult {
        regions_signed,
        metadata_digest,
        content_digest,
        metadata_digest_full,
        content_digest_full,
        timestamp,
    })
}

/// Sign an RGBA pixel buffer in place, timestamped with the current time.
pub fn sign_image<M: SealMetadata + ?Sized>(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    metadata: &M,
) -> Result<SignResult> {
    let now = chrono::Utc::now().timestamp();
    let timestamp =
        u32::try_from(now).map_err(|_| PixsealError::TimestampOutOfRange(now))?;
    sign_image_at(pixels, width, height, metadata, timestamp)
}

/// Verify a pixel buffer without the original metadata.
///
/// The strongest reachable verdict on this path is
/// [`VerifiedUnconfirmed`](crate::Verdict::VerifiedUnconfirmed): the
/// signature can be structurally sound, but there is nothing to confirm the
/// metadata digest against.
pub fn verify_image(pixels: &[u8], width: u32, height: u32) -> Result<VerificationReport> {
    check_buffer(pixels, width, height)?;
    Ok(run_verification(pixels, width, height, None))
}

/// Verify a pixel buffer against the original metadata payload.
///
/// Recomputes the truncated metadata digest and compares it with the
/// embedded one; a mismatch yields [`Tampered`](crate::Verdict::Tampered).
pub fn verify_image_against<M: SealMetadata + ?Sized>(
    pixels: &[u8],
    width: u32,
    height: u32,
    metadata: &M,
) -> Result<VerificationReport> {
    check_buffer(pixels, width, height)?;
    let metadata_bytes = metadata.to_signing_bytes()?;
    let expected = hashing::digest_truncated(&metadata_bytes);
    Ok(run_verification(pixels, width, height, Some(expected)))
}

fn run_verification(
    pixels: &[u8],
    width: u32,
    height: u32,
    expected_metadata_digest: Option<[u8; TRUNCATED_DIGEST_LEN]>,
) -> VerificationReport {
    let regions = REGIONS
        .iter()
        .map(|region| RegionReport {
            region: region.id,
            outcome: inspect_region(pixels, width, height, region.id),
        })
        .collect();

    let report = aggregate(regions, expected_metadata_digest);
    debug!(verdict = ?report.verdict, "verification complete");
    report
}

/// Classify one region of the buffer.
fn inspect_region(pixels: &[u8], width: u32, height: u32, id: RegionId) -> RegionOutcome {
    let region = id.descriptor();
    if !region.fits(width, height) {
        return RegionOutcome::Unavailable;
    }

    let candidate = extract_candidate(pixels, width, height, region);
    if candidate.len() < RECORD_LEN {
        return RegionOutcome::Unavailable;
    }

    // The top-left region is also where retired v1 single-copy signatures
    // lived; recognize them read-only for migration.
    let unpacked = match record::unpack(&candidate) {
        Some(u) => u,
        None if id == RegionId::TopLeft => match record::unpack_legacy(&candidate) {
            Some(u) => u,
            None => return RegionOutcome::Absent,
        },
        None => return RegionOutcome::Absent,
    };

    if !unpacked.is_intact() {
        return RegionOutcome::Corrupted {
            stored_checksum: unpacked.stored_checksum,
            computed_checksum: unpacked.computed_checksum,
        };
    }

    match unpacked.to_record() {
        Some(record) => RegionOutcome::Valid { record },
        // Checksum-intact but the region byte maps to nothing we ever
        // write: treat as a tamper signal, not a valid signature.
        None => RegionOutcome::Corrupted {
            stored_checksum: unpacked.stored_checksum,
            computed_checksum: unpacked.computed_checksum,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProvenanceMetadata;

    fn rgba_buffer(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    #[test]
    fn test_sign_rejects_undersized_image() {
        let mut pixels = rgba_buffer(32, 32);
        let before = pixels.clone();
        let err = sign_image_at(&mut pixels, 32, 32, b"meta".as_slice(), 1_700_000_000)
            .unwrap_err();
        assert!(matches!(err, PixsealError::ImageTooSmall { .. }));
        // All-or-nothing: nothing was mutated.
        assert_eq!(pixels, before);
    }

    #[test]
    fn test_sign_rejects_buffer_dimension_mismatch() {
        let mut pixels = rgba_buffer(64, 64);
        pixels.pop();
        let err =
            sign_image_at(&mut pixels, 64, 64, b"meta".as_slice(), 1_700_000_000).unwrap_err();
        assert!(matches!(err, PixsealError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn test_sign_reports_all_three_regions() {
        let mut pixels = rgba_buffer(64, 64);
        let result =
            sign_image_at(&mut pixels, 64, 64, b"meta".as_slice(), 1_700_000_000).unwrap();
        assert_eq!(result.regions_signed, RegionId::ALL.to_vec());
        assert_eq!(result.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_digests_are_truncations_of_full() {
        let mut pixels = rgba_buffer(64, 64);
        let result =
            sign_image_at(&mut pixels, 64, 64, b"meta".as_slice(), 1_700_000_000).unwrap();
        assert_eq!(
            result.metadata_digest,
            result.metadata_digest_full[..TRUNCATED_DIGEST_LEN]
        );
        assert_eq!(
            result.content_digest,
            result.content_digest_full[..TRUNCATED_DIGEST_LEN]
        );
        assert_eq!(result.metadata_digest_hex().len(), 32);
    }

    #[test]
    fn test_sign_then_verify_against_metadata() {
        let meta = ProvenanceMetadata::new("model-a", "a red fox");
        let mut pixels = rgba_buffer(64, 64);
        sign_image_at(&mut pixels, 64, 64, &meta, 1_700_000_000).unwrap();

        let report = verify_image_against(&pixels, 64, 64, &meta).unwrap();
        assert_eq!(report.verdict, crate::verify::Verdict::Verified);
        assert_eq!(report.valid_regions().len(), 3);
        assert!(!report.timestamp_mismatch);
    }

    #[test]
    fn test_wrong_metadata_is_tampered() {
        let meta = ProvenanceMetadata::new("model-a", "a red fox");
        let mut pixels = rgba_buffer(64, 64);
        sign_image_at(&mut pixels, 64, 64, &meta, 1_700_000_000).unwrap();

        let other = ProvenanceMetadata::new("model-a", "a blue fox");
        let report = verify_image_against(&pixels, 64, 64, &other).unwrap();
        assert!(matches!(
            report.verdict,
            crate::verify::Verdict::Tampered { .. }
        ));
    }

    #[test]
    fn test_verify_without_metadata_is_unconfirmed() {
        let mut pixels = rgba_buffer(64, 64);
        sign_image_at(&mut pixels, 64, 64, b"meta".as_slice(), 1_700_000_000).unwrap();

        let report = verify_image(&pixels, 64, 64).unwrap();
        assert_eq!(
            report.verdict,
            crate::verify::Verdict::VerifiedUnconfirmed
        );
    }

    #[test]
    fn test_unsigned_buffer_is_unsigned() {
        let pixels = rgba_buffer(64, 64);
        let report = verify_image(&pixels, 64, 64).unwrap();
        assert_eq!(report.verdict, crate::verify::Verdict::Unsigned);
        for region in &report.regions {
            assert_eq!(region.outcome, RegionOutcome::Absent);
        }
    }

    #[test]
    fn test_min_size_gate_precedes_region_skipping() {
        // Tall and narrow: the vertical strip would fit, but the minimum
        // size gate rejects the image before any region is considered.
        let (w, h) = (16, 512);
        let mut pixels = rgba_buffer(w, h);
        let err = sign_image_at(&mut pixels, w, h, b"m".as_slice(), 1).unwrap_err();
        assert!(matches!(err, PixsealError::ImageTooSmall { .. }));
    }

    #[test]
    fn test_legacy_record_recognized_at_top_left() {
        use crate::record::{LEGACY_MARKER, RECORD_LEN};

        let (w, h) = (64u32, 64u32);
        let mut pixels = rgba_buffer(w, h);

        // Hand-embed a v1 record at the top-left region.
        let mut v1 = [0u8; RECORD_LEN];
        v1[0..8].copy_from_slice(LEGACY_MARKER);
        v1[8..24].copy_from_slice(&hashing::digest_truncated(b"old-meta"));
        v1[24..40].copy_from_slice(&[0x77; 16]);
        v1[40..44].copy_from_slice(&1_500_000_000u32.to_be_bytes());
        let crc = crate::checksum::crc32(&v1[..44]);
        v1[44..48].copy_from_slice(&crc.to_be_bytes());
        embed_record(&mut pixels, w, h, RegionId::TopLeft.descriptor(), &v1);

        let report = verify_image_against(&pixels, w, h, b"old-meta".as_slice()).unwrap();
        assert_eq!(report.verdict, crate::verify::Verdict::Verified);
        assert_eq!(report.valid_regions(), vec![RegionId::TopLeft]);
        assert_eq!(report.canonical.unwrap().timestamp, 1_500_000_000);
    }
}
