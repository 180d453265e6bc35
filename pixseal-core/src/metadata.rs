//! Metadata boundary.
//!
//! The signing core treats the metadata payload as an opaque byte sequence:
//! it computes digests over the serialized form and never interprets the
//! contents. [`SealMetadata`] is the narrow seam between the core and
//! whatever schema the calling application embeds semantically.

use serde::{Deserialize, Serialize};

use crate::error::{PixsealError, Result};

/// Anything that can be deterministically serialized for digesting.
///
/// Implementations must be stable: the same value must always produce the
/// same bytes, or verification against the original metadata will report a
/// spurious mismatch.
pub trait SealMetadata {
    /// Serialize to the byte form that gets digested and signed over.
    fn to_signing_bytes(&self) -> Result<Vec<u8>>;
}

impl SealMetadata for [u8] {
    fn to_signing_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl SealMetadata for Vec<u8> {
    fn to_signing_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

impl SealMetadata for serde_json::Value {
    fn to_signing_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PixsealError::MetadataSerialization(e.to_string()))
    }
}

/// Generation provenance for an AI-produced image.
///
/// Serialized with `serde_json` in declaration order, so the digest of a
/// given value is reproducible across processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceMetadata {
    /// Model identifier that produced the image.
    pub model: String,
    /// Prompt the image was generated from.
    pub prompt: String,
    /// Sampler seed, when the generator exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Application or service that invoked the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
}

impl ProvenanceMetadata {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            seed: None,
            generator: None,
        }
    }
}

impl SealMetadata for ProvenanceMetadata {
    fn to_signing_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| PixsealError::MetadataSerialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes_pass_through() {
        let payload = vec![0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(payload.to_signing_bytes().unwrap(), payload);
    }

    #[test]
    fn test_provenance_serialization_is_stable() {
        let meta = ProvenanceMetadata::new("x", "y");
        let a = meta.to_signing_bytes().unwrap();
        let b = meta.to_signing_bytes().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, br#"{"model":"x","prompt":"y"}"#.to_vec());
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let meta = ProvenanceMetadata::new("m", "p");
        let bytes = meta.to_signing_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("seed"));
        assert!(!text.contains("generator"));
    }

    #[test]
    fn test_json_value_metadata() {
        let value = serde_json::json!({"model": "x", "prompt": "y"});
        let bytes = value.to_signing_bytes().unwrap();
        assert!(!bytes.is_empty());
    }
}
