//! SHA-256 digest adapter.
//!
//! Embedded signature records carry the first 16 bytes of the SHA-256 digest
//! to fit the 48-byte record budget; the full 32-byte digest is surfaced in
//! [`SignResult`](crate::SignResult) so callers can persist it out-of-band
//! for higher-assurance verification.

use sha2::{Digest, Sha256};

/// Full SHA-256 digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// Truncated digest length used inside embedded records.
pub const TRUNCATED_DIGEST_LEN: usize = 16;

/// Compute the full SHA-256 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&result);
    out
}

/// Compute the first 16 bytes of the SHA-256 digest of `data`.
pub fn digest_truncated(data: &[u8]) -> [u8; TRUNCATED_DIGEST_LEN] {
    let full = digest(data);
    let mut out = [0u8; TRUNCATED_DIGEST_LEN];
    out.copy_from_slice(&full[..TRUNCATED_DIGEST_LEN]);
    out
}
