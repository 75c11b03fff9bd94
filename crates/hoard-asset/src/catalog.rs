//! Asset catalog for managing asset metadata

use crate::types::{AssetRecord, AssetType};
use hoard_core::{HoardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent metadata for assets, keyed by content hash
pub trait MetadataCatalog {
    /// Look up the record previously cataloged under `hash`
    fn find_by_hash(&self, hash: &str) -> Option<AssetRecord>;

    /// Insert or replace every record in `records`.
    ///
    /// Atomic across the whole batch: on error no record is changed.
    fn upsert_batch(&mut self, records: Vec<AssetRecord>) -> Result<()>;
}

/// On-disk layout of the catalog file
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "asset")]
    assets: Vec<AssetRecord>,
}

/// Catalog of known assets, optionally backed by a TOML file
#[derive(Debug, Default)]
pub struct AssetCatalog {
    /// Records indexed by content hash
    assets: HashMap<String, AssetRecord>,
    path: Option<PathBuf>,
}

impl AssetCatalog {
    /// Create a new empty in-memory catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the catalog stored at `path`; a missing file is an empty catalog
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut catalog = Self {
            assets: HashMap::new(),
            path: Some(path.clone()),
        };

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: CatalogFile = toml::from_str(&content).map_err(|e| {
                HoardError::TomlParseError(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            for record in file.assets {
                catalog.assets.insert(record.content_hash.clone(), record);
            }
        }

        Ok(catalog)
    }

    /// Get a record by content hash
    pub fn get(&self, hash: &str) -> Option<&AssetRecord> {
        self.assets.get(hash)
    }

    /// Get all records of a given type
    pub fn by_type(&self, asset_type: AssetType) -> Vec<&AssetRecord> {
        let mut found: Vec<_> = self
            .assets
            .values()
            .filter(|a| a.asset_type == asset_type)
            .collect();
        found.sort_by(|a, b| a.content_hash.cmp(&b.content_hash));
        found
    }

    /// Records whose dependency table references `hash`
    pub fn dependents_of(&self, hash: &str) -> Vec<&AssetRecord> {
        let mut found: Vec<_> = self
            .assets
            .values()
            .filter(|a| a.dependencies.iter().any(|d| d == hash))
            .collect();
        found.sort_by(|a, b| a.content_hash.cmp(&b.content_hash));
        found
    }

    /// All records sorted by content hash
    pub fn records(&self) -> Vec<&AssetRecord> {
        let mut all: Vec<_> = self.assets.values().collect();
        all.sort_by(|a, b| a.content_hash.cmp(&b.content_hash));
        all
    }

    /// Get the number of cataloged assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Write the full record set next to the catalog file, then rename it into
    /// place so readers never observe a half-written catalog.
    fn persist(path: &Path, assets: &HashMap<String, AssetRecord>) -> Result<()> {
        let mut records: Vec<AssetRecord> = assets.values().cloned().collect();
        records.sort_by(|a, b| a.content_hash.cmp(&b.content_hash));
        let content = toml::to_string_pretty(&CatalogFile { assets: records })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        if let Err(e) = fs::rename(&tmp, path) {
            fs::remove_file(&tmp).ok();
            return Err(e.into());
        }
        Ok(())
    }
}

impl MetadataCatalog for AssetCatalog {
    fn find_by_hash(&self, hash: &str) -> Option<AssetRecord> {
        self.assets.get(hash).cloned()
    }

    fn upsert_batch(&mut self, records: Vec<AssetRecord>) -> Result<()> {
        let mut merged = self.assets.clone();
        for record in records {
            merged.insert(record.content_hash.clone(), record);
        }

        if let Some(path) = &self.path {
            Self::persist(path, &merged).map_err(|e| {
                HoardError::CatalogCommit(format!("Failed to write {}: {}", path.display(), e))
            })?;
        }

        self.assets = merged;
        Ok(())
    }
}
