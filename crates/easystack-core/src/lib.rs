//! Easystack planning entry point.
//!
//! This crate ties the schema layer to the filesystem: `parse_easystack` reads
//! a manifest, normalizes it, applies the invocation's label filter, and
//! returns an `EasystackPlan` holding the ordered easyconfig targets and the
//! execution mode. `PlannerConfig` carries per-user defaults for the CLI.

pub mod config;
pub mod plan;

pub use config::PlannerConfig;
pub use plan::{parse_easystack, EasystackPlan, PlanOptions};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] easystack_schema::ManifestError),
    #[error("config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
