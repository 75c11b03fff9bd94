//! CLI command implementations

pub mod catalog;
pub mod import;
pub mod inspect;
