//! Store-wide import runs

use hoard_asset::{
    AssetRecord, AssetVerifier, ContentStore, MetadataCatalog, Platform, RejectedAsset,
};
use hoard_core::{HoardError, Result};
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Phase of an import run.
///
/// Nothing is written to the catalog while `Scanning`; `Committing` is the
/// single batched write. There is no partially committed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    Scanning,
    Committing,
    Done,
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportState::Scanning => f.write_str("scanning"),
            ImportState::Committing => f.write_str("committing"),
            ImportState::Done => f.write_str("done"),
        }
    }
}

/// Outcome of a completed import run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// Top-level keys considered
    pub processed_count: usize,
    /// Records with no prior catalog entry
    pub new_count: usize,
    /// Records that replaced a prior catalog entry
    pub updated_count: usize,
    pub rejected_count: usize,
    pub rejected: Vec<RejectedAsset>,
    pub elapsed_secs: f64,
}

impl ImportSummary {
    pub fn imported_count(&self) -> usize {
        self.new_count + self.updated_count
    }

    /// Keys that were neither imported nor explicitly rejected
    pub fn unaccounted_count(&self) -> usize {
        self.processed_count
            .saturating_sub(self.imported_count() + self.rejected_count)
    }
}

/// Bookkeeping for one `import_all` invocation
struct ImportRun {
    state: ImportState,
    pending: Vec<AssetRecord>,
    summary: ImportSummary,
    started: Instant,
}

impl ImportRun {
    fn new() -> Self {
        tracing::debug!(state = %ImportState::Scanning, "import run started");
        Self {
            state: ImportState::Scanning,
            pending: Vec::new(),
            summary: ImportSummary::default(),
            started: Instant::now(),
        }
    }

    fn advance(&mut self, next: ImportState) {
        debug_assert!(
            matches!(
                (self.state, next),
                (ImportState::Scanning, ImportState::Committing)
                    | (ImportState::Committing, ImportState::Done)
            ),
            "invalid import transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "import state changed");
        self.state = next;
    }

    fn accept(&mut self, record: AssetRecord, had_prior: bool) {
        if had_prior {
            self.summary.updated_count += 1;
        } else {
            self.summary.new_count += 1;
        }
        tracing::info!(
            hash = %record.content_hash,
            "Processed {} asset {} ({})",
            record.asset_type,
            record.content_hash,
            record.safety_level()
        );
        self.pending.push(record);
    }

    fn reject(&mut self, rejected: RejectedAsset) {
        self.summary.rejected_count += 1;
        self.summary.rejected.push(rejected);
    }
}

/// Reconciles a content store against a metadata catalog
#[derive(Default)]
pub struct AssetImporter {
    verifier: AssetVerifier,
}

impl AssetImporter {
    pub fn new(verifier: AssetVerifier) -> Self {
        Self { verifier }
    }

    /// Verify every top-level key in `store` and upsert the results into
    /// `catalog` as one batch.
    ///
    /// Per-asset failures (hash mismatches, unreadable keys) are counted and
    /// skipped. Only a failure to list the store or to commit the batch is
    /// returned as an error, and in that case nothing from this run is
    /// committed. The exclusive borrow of `catalog` keeps runs against one
    /// catalog from overlapping.
    pub fn import_all<S, C>(
        &self,
        store: &S,
        catalog: &mut C,
        platform: Option<Platform>,
    ) -> Result<ImportSummary>
    where
        S: ContentStore + ?Sized,
        C: MetadataCatalog + ?Sized,
    {
        let mut run = ImportRun::new();

        for hash in store.list_top_level_keys()? {
            run.summary.processed_count += 1;

            let data = match store.read(&hash) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(hash = %hash, error = %e, "Could not read asset from store");
                    run.reject(RejectedAsset::store_read(&hash, &e));
                    continue;
                }
            };

            let prior = catalog.find_by_hash(&hash);
            match self.verifier.verify(&hash, &data, platform, prior.as_ref()) {
                Ok(record) => run.accept(record, prior.is_some()),
                Err(rejected) => run.reject(rejected),
            }
        }

        run.advance(ImportState::Committing);
        let batch = std::mem::take(&mut run.pending);
        let batch_len = batch.len();
        if let Err(e) = catalog.upsert_batch(batch) {
            tracing::error!(records = batch_len, error = %e, "Catalog commit failed, nothing was imported");
            return Err(match e {
                HoardError::CatalogCommit(_) => e,
                other => HoardError::CatalogCommit(other.to_string()),
            });
        }
        run.advance(ImportState::Done);

        let mut summary = run.summary;
        summary.elapsed_secs = run.started.elapsed().as_secs_f64();

        tracing::info!(
            "Successfully imported {}/{} assets ({} new, {} updated, {} rejected) in {:.2}s",
            summary.imported_count(),
            summary.processed_count,
            summary.new_count,
            summary.updated_count,
            summary.rejected_count,
            summary.elapsed_secs
        );
        let accounted = summary.imported_count() + summary.rejected_count;
        if accounted != summary.processed_count {
            tracing::warn!(
                processed = summary.processed_count,
                imported = summary.imported_count(),
                rejected = summary.rejected_count,
                "{} keys were seen but {} were imported or rejected",
                summary.processed_count,
                accounted
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use hoard_asset::{AssetCatalog, AssetType, MemoryStore, RejectReason};
    use hoard_core::{FixedClock, Sha1Hash};

    fn first_run() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn second_run() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    fn importer_at(at: DateTime<Utc>) -> AssetImporter {
        AssetImporter::new(AssetVerifier::default().with_clock(Box::new(FixedClock(at))))
    }

    fn put_blob(store: &mut MemoryStore, data: &[u8]) -> String {
        let hash = Sha1Hash::from_bytes(data).to_hex();
        store.put(&hash, data).unwrap();
        hash
    }

    fn level_referencing(dep: &str) -> Vec<u8> {
        let digest = Sha1Hash::from_hex(dep).unwrap();
        let mut data = b"LVLb".to_vec();
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(&12u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.push(0x1);
        data.extend_from_slice(digest.as_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]);
        data
    }

    /// A catalog whose batch writes always fail
    struct BrokenCatalog {
        inner: AssetCatalog,
        attempts: usize,
    }

    impl MetadataCatalog for BrokenCatalog {
        fn find_by_hash(&self, hash: &str) -> Option<AssetRecord> {
            self.inner.find_by_hash(hash)
        }

        fn upsert_batch(&mut self, _records: Vec<AssetRecord>) -> Result<()> {
            self.attempts += 1;
            Err(HoardError::Io(std::io::Error::other("disk full")))
        }
    }

    /// Lists one extra key that has disappeared by the time it is read
    struct VanishingStore {
        inner: MemoryStore,
        vanished: String,
    }

    impl ContentStore for VanishingStore {
        fn list_keys(&self) -> Result<Vec<String>> {
            let mut keys = self.inner.list_keys()?;
            keys.push(self.vanished.clone());
            Ok(keys)
        }

        fn read(&self, key: &str) -> Result<Vec<u8>> {
            if key == self.vanished {
                return Err(HoardError::KeyNotFound(key.to_string()));
            }
            self.inner.read(key)
        }

        fn put(&mut self, key: &str, data: &[u8]) -> Result<()> {
            self.inner.put(key, data)
        }
    }

    #[test]
    fn test_import_new_assets() {
        let mut store = MemoryStore::new();
        let png = put_blob(&mut store, &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3]);
        let level = put_blob(&mut store, &level_referencing(&png));
        let mut catalog = AssetCatalog::new();

        let summary = importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.processed_count, 2);
        assert_eq!(summary.new_count, 2);
        assert_eq!(summary.updated_count, 0);
        assert_eq!(summary.rejected_count, 0);

        let record = catalog.get(&level).unwrap();
        assert_eq!(record.asset_type, AssetType::Level);
        assert_eq!(record.dependencies, vec![png.clone()]);
        assert_eq!(record.uploaded_at, first_run());
        assert_eq!(catalog.get(&png).unwrap().asset_type, AssetType::Png);
        assert_eq!(catalog.dependents_of(&png).len(), 1);
    }

    #[test]
    fn test_sub_resource_keys_are_skipped() {
        let mut store = MemoryStore::new();
        let hash = put_blob(&mut store, b"top level");
        store.put(&format!("psp/{}", hash), b"variant").unwrap();
        let mut catalog = AssetCatalog::new();

        let summary = importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.processed_count, 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_reimport_is_idempotent_for_provenance() {
        let mut store = MemoryStore::new();
        let a = put_blob(&mut store, b"LVLb but far too short");
        let b = put_blob(&mut store, b"plain blob");
        let mut catalog = AssetCatalog::new();

        importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();
        let first: Vec<AssetRecord> = [&a, &b]
            .iter()
            .map(|h| catalog.find_by_hash(h).unwrap())
            .collect();

        let summary = importer_at(second_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.new_count, 0);
        assert_eq!(summary.updated_count, 2);
        for before in first {
            let after = catalog.find_by_hash(&before.content_hash).unwrap();
            assert_eq!(after.uploaded_at, before.uploaded_at);
            assert_eq!(after.original_uploader, before.original_uploader);
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_reimport_keeps_uploader_and_recomputes_type() {
        let mut store = MemoryStore::new();
        let hash = put_blob(&mut store, b"PLNb\0\0\0\0\0\0\0\x0c\0\0\0\0");
        let mut catalog = AssetCatalog::new();
        catalog
            .upsert_batch(vec![AssetRecord {
                content_hash: hash.clone(),
                asset_type: AssetType::Unknown,
                size_in_bytes: 0,
                is_platform_variant: false,
                uploaded_at: first_run(),
                original_uploader: Some("dave".to_string()),
                dependencies: vec!["stale".to_string()],
            }])
            .unwrap();

        let summary = importer_at(second_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.updated_count, 1);
        let record = catalog.get(&hash).unwrap();
        assert_eq!(record.original_uploader.as_deref(), Some("dave"));
        assert_eq!(record.uploaded_at, first_run());
        assert_eq!(record.asset_type, AssetType::Plan);
        assert_eq!(record.size_in_bytes, 16);
        assert!(record.dependencies.is_empty());
    }

    #[test]
    fn test_rejected_assets_leave_catalog_untouched() {
        let mut store = MemoryStore::new();
        let good = put_blob(&mut store, b"good bytes");
        let claimed = Sha1Hash::from_bytes(b"original bytes").to_hex();
        store.put(&claimed, b"corrupted bytes").unwrap();

        let existing = AssetRecord {
            content_hash: claimed.clone(),
            asset_type: AssetType::Mesh,
            size_in_bytes: 14,
            is_platform_variant: false,
            uploaded_at: first_run(),
            original_uploader: Some("erin".to_string()),
            dependencies: vec![],
        };
        let mut catalog = AssetCatalog::new();
        catalog.upsert_batch(vec![existing.clone()]).unwrap();

        let summary = importer_at(second_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.processed_count, 2);
        assert_eq!(summary.new_count, 1);
        assert_eq!(summary.rejected_count, 1);
        assert_eq!(summary.rejected[0].hash, claimed);
        assert!(matches!(
            summary.rejected[0].reason,
            RejectReason::HashMismatch { .. }
        ));
        assert_eq!(catalog.find_by_hash(&claimed), Some(existing));
        assert!(catalog.get(&good).is_some());
    }

    #[test]
    fn test_unreadable_key_is_rejected_and_run_continues() {
        let mut inner = MemoryStore::new();
        let kept = put_blob(&mut inner, b"still here");
        let vanished = "f".repeat(40);
        let store = VanishingStore {
            inner,
            vanished: vanished.clone(),
        };
        let mut catalog = AssetCatalog::new();

        let summary = importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.processed_count, 2);
        assert_eq!(summary.new_count, 1);
        assert_eq!(summary.rejected_count, 1);
        assert_eq!(summary.unaccounted_count(), 0);
        assert_eq!(summary.rejected[0].hash, vanished);
        assert!(matches!(
            summary.rejected[0].reason,
            RejectReason::StoreRead { .. }
        ));
        assert!(catalog.get(&kept).is_some());
        assert!(catalog.find_by_hash(&vanished).is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_mismatch_without_prior_is_never_cataloged() {
        let mut store = MemoryStore::new();
        let claimed = Sha1Hash::from_bytes(b"expected").to_hex();
        store.put(&claimed, b"something else").unwrap();
        let mut catalog = AssetCatalog::new();

        let summary = importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.rejected_count, 1);
        assert!(catalog.find_by_hash(&claimed).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_platform_context_flows_to_records() {
        let mut store = MemoryStore::new();
        let hash = put_blob(&mut store, b"psp asset");
        let mut catalog = AssetCatalog::new();

        importer_at(first_run())
            .import_all(&store, &mut catalog, Some(Platform::Psp))
            .unwrap();

        assert!(catalog.get(&hash).unwrap().is_platform_variant);
    }

    #[test]
    fn test_commit_failure_is_fatal_and_commits_nothing() {
        let mut store = MemoryStore::new();
        put_blob(&mut store, b"one");
        put_blob(&mut store, b"two");
        let mut catalog = BrokenCatalog {
            inner: AssetCatalog::new(),
            attempts: 0,
        };

        let result = importer_at(first_run()).import_all(&store, &mut catalog, None);

        assert!(matches!(result, Err(HoardError::CatalogCommit(_))));
        assert_eq!(catalog.attempts, 1);
        assert!(catalog.inner.is_empty());
    }

    #[test]
    fn test_empty_store_commits_empty_batch() {
        let store = MemoryStore::new();
        let mut catalog = AssetCatalog::new();

        let summary = importer_at(first_run())
            .import_all(&store, &mut catalog, None)
            .unwrap();

        assert_eq!(summary.processed_count, 0);
        assert_eq!(summary.imported_count(), 0);
        assert_eq!(summary.unaccounted_count(), 0);
    }

    #[test]
    fn test_summary_counts() {
        let summary = ImportSummary {
            processed_count: 5,
            new_count: 2,
            updated_count: 1,
            rejected_count: 1,
            ..Default::default()
        };
        assert_eq!(summary.imported_count(), 3);
        assert_eq!(summary.unaccounted_count(), 1);
    }
}
