//! Content-addressed blob storage
//!
//! Top-level keys are content hashes. Keys containing `/` address
//! sub-resources (for example platform-specific variants under `psp/`)
//! and are never imported as assets on their own.

use hoard_core::{HoardError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Whether a store key names a top-level content hash
pub fn is_top_level_key(key: &str) -> bool {
    !key.contains('/')
}

/// Key-value byte store keyed by content hash
pub trait ContentStore {
    /// Every key in the store, including path-qualified sub-resources
    fn list_keys(&self) -> Result<Vec<String>>;

    /// Read the bytes stored under `key`.
    ///
    /// Fails with [`HoardError::KeyNotFound`] if the key has disappeared.
    fn read(&self, key: &str) -> Result<Vec<u8>>;

    fn put(&mut self, key: &str, data: &[u8]) -> Result<()>;

    /// Keys that denote a top-level content hash
    fn list_top_level_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .list_keys()?
            .into_iter()
            .filter(|k| is_top_level_key(k))
            .collect())
    }
}

/// Directory-backed store: the key is the path relative to the root
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn scan_directory(&self, dir: &Path, prefix: &str, keys: &mut Vec<String>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };

            if entry.file_type()?.is_dir() {
                self.scan_directory(&entry.path(), &key, keys)?;
            } else {
                keys.push(key);
            }
        }
        Ok(())
    }

    fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(HoardError::StoreRead {
                key: key.to_string(),
                reason: "invalid key".to_string(),
            });
        }
        Ok(key.split('/').fold(self.root.clone(), |path, part| path.join(part)))
    }
}

impl ContentStore for FsStore {
    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        if !self.root.exists() {
            return Ok(keys);
        }
        self.scan_directory(&self.root, "", &mut keys)?;
        keys.sort();
        Ok(keys)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for_key(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => HoardError::KeyNotFound(key.to_string()),
            _ => HoardError::StoreRead {
                key: key.to_string(),
                reason: e.to_string(),
            },
        })
    }

    fn put(&mut self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for_key(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

/// In-memory store with deterministic key order
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.blobs.remove(key)
    }
}

impl ContentStore for MemoryStore {
    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.blobs.keys().cloned().collect())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        self.blobs
            .get(key)
            .cloned()
            .ok_or_else(|| HoardError::KeyNotFound(key.to_string()))
    }

    fn put(&mut self, key: &str, data: &[u8]) -> Result<()> {
        self.blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }
}
