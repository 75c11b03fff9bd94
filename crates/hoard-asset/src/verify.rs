//! Integrity verification and record construction
//!
//! A blob is only turned into an [`AssetRecord`] once its SHA-1 matches the
//! hash it was stored under.

use crate::classify::{AssetClassifier, MagicClassifier};
use crate::deptable::parse_dependency_table;
use crate::types::{AssetRecord, Platform};
use hoard_core::{Clock, HoardError, Sha1Hash, SystemClock};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a store entry was kept out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The payload hashes to something other than its key
    HashMismatch { actual: String },
    /// The store could not produce bytes for the key
    StoreRead { reason: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::HashMismatch { actual } => write!(f, "actually hashed as {}", actual),
            RejectReason::StoreRead { reason } => write!(f, "store read failed: {}", reason),
        }
    }
}

/// A store entry that produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("rejected {hash}: {reason}")]
pub struct RejectedAsset {
    pub hash: String,
    pub reason: RejectReason,
}

impl RejectedAsset {
    pub fn store_read(hash: &str, err: &HoardError) -> Self {
        Self {
            hash: hash.to_string(),
            reason: RejectReason::StoreRead {
                reason: err.to_string(),
            },
        }
    }
}

impl From<RejectedAsset> for HoardError {
    fn from(rejected: RejectedAsset) -> Self {
        match rejected.reason {
            RejectReason::HashMismatch { actual } => HoardError::HashMismatch {
                claimed: rejected.hash,
                actual,
            },
            RejectReason::StoreRead { reason } => HoardError::StoreRead {
                key: rejected.hash,
                reason,
            },
        }
    }
}

/// Builds verified asset records from raw bytes
pub struct AssetVerifier {
    classifier: Box<dyn AssetClassifier>,
    clock: Box<dyn Clock>,
}

impl Default for AssetVerifier {
    fn default() -> Self {
        Self::new(Box::new(MagicClassifier), Box::new(SystemClock))
    }
}

impl AssetVerifier {
    pub fn new(classifier: Box<dyn AssetClassifier>, clock: Box<dyn Clock>) -> Self {
        Self { classifier, clock }
    }

    /// Replace the time source used for first-seen assets
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify `data` against `claimed_hash` and build its record.
    ///
    /// A garbled dependency table is logged and yields an empty dependency
    /// list; it does not reject the asset. Provenance comes from `prior` when
    /// given, otherwise the asset is stamped as uploaded now by nobody.
    pub fn verify(
        &self,
        claimed_hash: &str,
        data: &[u8],
        platform: Option<Platform>,
        prior: Option<&AssetRecord>,
    ) -> Result<AssetRecord, RejectedAsset> {
        let actual = Sha1Hash::from_bytes(data).to_hex();
        if actual != claimed_hash {
            tracing::warn!(
                claimed = claimed_hash,
                actual = %actual,
                "{} is actually hashed as {}, asset is likely corrupt",
                claimed_hash,
                actual
            );
            return Err(RejectedAsset {
                hash: claimed_hash.to_string(),
                reason: RejectReason::HashMismatch { actual },
            });
        }

        let asset_type = self.classifier.classify(data, platform);

        let dependencies = if asset_type.has_dependency_table() {
            match parse_dependency_table(data) {
                Ok(deps) => deps,
                Err(e) => {
                    tracing::warn!(hash = claimed_hash, "Could not parse dependency table: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        // The clock is only read for assets with no prior record; the merge
        // below then carries the prior uploader (and the same timestamp) over.
        let record = AssetRecord {
            content_hash: actual,
            asset_type,
            size_in_bytes: data.len(),
            is_platform_variant: platform.is_some_and(Platform::is_variant),
            uploaded_at: prior.map_or_else(|| self.clock.now(), |old| old.uploaded_at),
            original_uploader: None,
            dependencies,
        };

        Ok(record.inherit_provenance(prior))
    }
}
