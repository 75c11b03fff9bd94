//! Hoard Core - Foundational types for the hoard asset importer
//!
//! This crate provides the core types that all other hoard crates depend on:
//! - `Sha1Hash` - SHA-1 content hashing for content-addressed assets
//! - `Clock` - Injectable time source
//! - Error types and Result alias

mod clock;
mod error;
mod hash;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{HoardError, Result};
pub use hash::Sha1Hash;
