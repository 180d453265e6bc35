//! Verification policy.
//!
//! Each region yields one of four independent outcomes; the policy folds the
//! three outcomes plus an optional caller-recomputed metadata digest into a
//! single verdict. Corruption and mismatch are terminal classifications the
//! caller branches on; nothing here is an error and nothing is retried.

use serde::Serialize;

use crate::hashing::TRUNCATED_DIGEST_LEN;
use crate::record::SignatureRecord;
use crate::stego::regions::RegionId;

/// The result of inspecting one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RegionOutcome {
    /// No signature marker found, a normal outcome for unsigned content.
    Absent,
    /// The region does not fit the image, or the extracted run was too
    /// short to hold a record.
    Unavailable,
    /// Marker present but the checksum does not match: the primary tamper
    /// signal for this region.
    Corrupted {
        stored_checksum: u32,
        computed_checksum: u32,
    },
    /// A structurally sound signature.
    Valid { record: SignatureRecord },
}

impl RegionOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, RegionOutcome::Valid { .. })
    }
}

/// One region's name paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    pub region: RegionId,
    #[serde(flatten)]
    pub outcome: RegionOutcome,
}

/// Overall authenticity verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Verdict {
    /// No valid signature in any region. Not necessarily tampered: the
    /// image may simply never have been signed.
    Unsigned,
    /// A valid signature exists but its metadata digest does not match the
    /// digest recomputed from the caller-supplied metadata.
    Tampered {
        expected_digest: [u8; TRUNCATED_DIGEST_LEN],
        embedded_digest: [u8; TRUNCATED_DIGEST_LEN],
    },
    /// Structurally sound and confirmed against the original metadata.
    Verified,
    /// Structurally sound, but no metadata was supplied to confirm against,
    /// a strictly weaker claim than [`Verdict::Verified`].
    VerifiedUnconfirmed,
}

/// The output of checking all three regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Per-region outcomes, in embedding order.
    pub regions: Vec<RegionReport>,
    /// The canonical signature: among valid regions, the one with the
    /// latest embedded timestamp.
    pub canonical: Option<SignatureRecord>,
    /// True when valid regions disagree on the timestamp, which points to a
    /// partially re-signed or spliced image. Surfaced, never silently
    /// resolved.
    pub timestamp_mismatch: bool,
    pub verdict: Verdict,
}

impl VerificationReport {
    /// Names of regions carrying a valid signature.
    pub fn valid_regions(&self) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|r| r.outcome.is_valid())
            .map(|r| r.region)
            .collect()
    }

    /// Names of regions without a valid signature.
    pub fn invalid_regions(&self) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|r| !r.outcome.is_valid())
            .map(|r| r.region)
            .collect()
    }

    pub fn is_verified(&self) -> bool {
        matches!(
            self.verdict,
            Verdict::Verified | Verdict::VerifiedUnconfirmed
        )
    }
}

/// Fold per-region outcomes into a report.
///
/// `expected_metadata_digest` is the truncated digest recomputed from the
/// caller-supplied metadata, when available; without it the strongest
/// reachable verdict is [`Verdict::VerifiedUnconfirmed`].
pub(crate) fn aggregate(
    regions: Vec<RegionReport>,
    expected_metadata_digest: Option<[u8; TRUNCATED_DIGEST_LEN]>,
) -> VerificationReport {
    let valid: Vec<&SignatureRecord> = regions
        .iter()
        .filter_map(|r| match &r.outcome {
            RegionOutcome::Valid { record } => Some(record),
            _ => None,
        })
        .collect();

    let canonical = valid
        .iter()
        .max_by_key(|record| record.timestamp)
        .map(|record| **record);

    let timestamp_mismatch = valid
        .windows(2)
        .any(|pair| pair[0].timestamp != pair[1].timestamp);

    let verdict = match (&canonical, expected_metadata_digest) {
        (None, _) => Verdict::Unsigned,
        (Some(record), Some(expected)) => {
            if record.metadata_digest == expected {
                Verdict::Verified
            } else {
                Verdict::Tampered {
                    expected_digest: expected,
                    embedded_digest: record.metadata_digest,
                }
            }
        }
        (Some(_), None) => Verdict::VerifiedUnconfirmed,
    };

    VerificationReport {
        regions,
        canonical,
        timestamp_mismatch,
        verdict,
    }
}
