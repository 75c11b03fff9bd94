//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `HOARD_STORE_DIR`, `HOARD_CATALOG_PATH`, `HOARD_PLATFORM`
//! 2. Project-local: `.hoard/config.toml`
//! 3. Global: `~/.hoard/config.toml`

use hoard_asset::Platform;
use hoard_core::{HoardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_STORE_DIR: &str = "dataStore";
const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

/// `[import]` section; every key is optional so layers can be partial
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSection {
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfigFile {
    #[serde(default)]
    pub import: ImportSection,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub store_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub platform: Option<Platform>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            platform: None,
        }
    }
}

impl ImportConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ImportConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".hoard/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Self::resolve(config)
    }

    /// Load config from a specific file path only, plus env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load_from_file_with(path, |key| std::env::var(key).ok())
    }

    /// Load a single file, taking overrides from `lookup` instead of the
    /// process environment
    pub fn load_from_file_with<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, lookup);
        Self::resolve(config)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".hoard").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ImportConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            HoardError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut ImportConfigFile, overlay: ImportConfigFile) {
        if overlay.import.store_dir.is_some() {
            base.import.store_dir = overlay.import.store_dir;
        }
        if overlay.import.catalog_path.is_some() {
            base.import.catalog_path = overlay.import.catalog_path;
        }
        if overlay.import.platform.is_some() {
            base.import.platform = overlay.import.platform;
        }
    }

    fn apply_env_overrides<F>(config: &mut ImportConfigFile, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("HOARD_STORE_DIR") {
            config.import.store_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup("HOARD_CATALOG_PATH") {
            config.import.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(platform) = lookup("HOARD_PLATFORM") {
            config.import.platform = Some(platform);
        }
    }

    fn resolve(file: ImportConfigFile) -> Result<Self> {
        let platform = file
            .import
            .platform
            .as_deref()
            .map(str::parse::<Platform>)
            .transpose()?;

        Ok(ImportConfig {
            store_dir: file
                .import
                .store_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            catalog_path: file
                .import
                .catalog_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            platform,
        })
    }
}
