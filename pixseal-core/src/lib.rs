//! Pixseal Core - pixel-embedded provenance signatures for AI-generated images.
//!
//! This crate embeds a compact, redundant, tamper-evident signature directly
//! into an image's pixel data, independent of any container metadata that
//! editors and platforms routinely strip. Three copies of a 48-byte record
//! are hidden in the low bits of spatially separated pixel regions, so
//! cropping one edge cannot silently remove provenance.
//!
//! # Features
//!
//! - 48-byte signature records with SHA-256 digests and a CRC-32 integrity
//!   check
//! - Redundant embedding across three fixed regions (4 bits per pixel, blue
//!   channel only; alpha is never touched)
//! - A verification state machine that distinguishes "never signed" from
//!   "signed then tampered"
//! - Read-only recognition of the retired v1 single-copy layout
//!
//! The scheme assumes lossless storage: lossy re-encoding destroys the
//! embedded bits by design.
//!
//! # Example
//!
//! ```
//! use pixseal_core::{sign_image_at, verify_image_against, ProvenanceMetadata, Verdict};
//!
//! # fn example() -> pixseal_core::Result<()> {
//! // A 64x64 RGBA buffer from an image decoder.
//! let (width, height) = (64u32, 64u32);
//! let mut pixels = vec![0u8; (width * height * 4) as usize];
//!
//! let metadata = ProvenanceMetadata::new("image-model-1", "a lighthouse at dusk");
//! let result = sign_image_at(&mut pixels, width, height, &metadata, 1_700_000_000)?;
//! assert_eq!(result.regions_signed.len(), 3);
//!
//! // Later, with the same metadata payload:
//! let report = verify_image_against(&pixels, width, height, &metadata)?;
//! assert_eq!(report.verdict, Verdict::Verified);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod checksum;
pub mod error;
pub mod hashing;
pub mod metadata;
pub mod record;
pub mod signer;
pub mod stego;
pub mod verify;

// Re-export main types for convenience
pub use checksum::crc32;
pub use error::{PixsealError, Result};
pub use hashing::{digest, digest_truncated, DIGEST_LEN, TRUNCATED_DIGEST_LEN};
pub use metadata::{ProvenanceMetadata, SealMetadata};
pub use record::{SignatureRecord, UnpackedRecord, FORMAT_VERSION, MARKER, RECORD_LEN};
pub use signer::{sign_image, sign_image_at, verify_image, verify_image_against, SignResult};
pub use stego::regions::{
    RegionId, MIN_SIGNABLE_HEIGHT, MIN_SIGNABLE_WIDTH, REGIONS,
};
pub use stego::CARRIER_CHANNEL;
pub use verify::{RegionOutcome, RegionReport, VerificationReport, Verdict};

#[cfg(test)]
mod tests {
    use super::*;

    /// Integration test: sign a buffer, verify it, confirm digests line up.
    #[test]
    fn test_full_sign_verify_workflow() {
        let (width, height) = (96u32, 96u32);
        let mut pixels = vec![0x40u8; (width * height * 4) as usize];

        let metadata = ProvenanceMetadata::new("image-model-1", "snow-covered pier");
        let result = sign_image_at(&mut pixels, width, height, &metadata, 1_700_000_000)
            .expect("signing should succeed");

        assert_eq!(result.regions_signed.len(), 3);
        assert_eq!(
            result.metadata_digest,
            digest_truncated(&metadata.to_signing_bytes().unwrap())
        );

        let report = verify_image_against(&pixels, width, height, &metadata)
            .expect("verification should run");
        assert_eq!(report.verdict, Verdict::Verified);

        let canonical = report.canonical.expect("a canonical signature exists");
        assert_eq!(canonical.timestamp, 1_700_000_000);
        assert_eq!(canonical.metadata_digest, result.metadata_digest);
        assert_eq!(canonical.content_digest, result.content_digest);
    }

    /// Different pixel content must produce different content digests.
    #[test]
    fn test_different_content_different_digest() {
        let (width, height) = (64u32, 64u32);
        let metadata = ProvenanceMetadata::new("m", "p");

        let mut a = vec![0x00u8; (width * height * 4) as usize];
        let mut b = vec![0xFFu8; (width * height * 4) as usize];

        let ra = sign_image_at(&mut a, width, height, &metadata, 1).unwrap();
        let rb = sign_image_at(&mut b, width, height, &metadata, 1).unwrap();

        assert_ne!(ra.content_digest, rb.content_digest);
        assert_eq!(ra.metadata_digest, rb.metadata_digest);
    }
}
