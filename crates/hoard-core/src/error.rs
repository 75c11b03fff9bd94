//! Error types for hoard

use thiserror::Error;

/// The main error type for hoard operations
#[derive(Debug, Error)]
pub enum HoardError {
    #[error("Hash mismatch: {claimed} is actually hashed as {actual}")]
    HashMismatch { claimed: String, actual: String },

    #[error("Truncated dependency table: {0}")]
    TruncatedDependencyTable(String),

    #[error("Failed to read store key {key}: {reason}")]
    StoreRead { key: String, reason: String },

    #[error("Key not found in store: {0}")]
    KeyNotFound(String),

    #[error("Catalog commit failed: {0}")]
    CatalogCommit(String),

    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for hoard operations
pub type Result<T> = std::result::Result<T, HoardError>;

impl From<toml::de::Error> for HoardError {
    fn from(err: toml::de::Error) -> Self {
        HoardError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for HoardError {
    fn from(err: toml::ser::Error) -> Self {
        HoardError::TomlSerError(err.to_string())
    }
}
