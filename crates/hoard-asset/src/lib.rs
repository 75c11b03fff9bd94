//! Hoard Asset - Content-addressed asset verification
//!
//! This crate turns raw blobs from a content-addressed store into verified
//! asset records: it checks integrity, classifies the format, extracts the
//! embedded dependency table and merges provenance from prior metadata.

mod catalog;
mod classify;
mod deptable;
mod store;
mod types;
mod verify;

pub use catalog::{AssetCatalog, MetadataCatalog};
pub use classify::{AssetClassifier, MagicClassifier};
pub use deptable::{parse_dependency_table, Cursor, ParseError};
pub use store::{is_top_level_key, ContentStore, FsStore, MemoryStore};
pub use types::{AssetRecord, AssetSafetyLevel, AssetType, Platform};
pub use verify::{AssetVerifier, RejectReason, RejectedAsset};
