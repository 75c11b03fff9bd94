//! Hoard Import - Store-to-catalog reconciliation
//!
//! This crate drives a full import run: every top-level key in a content
//! store is verified, and the resulting records are committed to the
//! metadata catalog in a single batch.

mod config;
mod importer;

pub use config::ImportConfig;
pub use importer::{AssetImporter, ImportState, ImportSummary};
