//! Shared types, error model, and configuration for catalogsync.
//!
//! This crate is the foundation depended on by all other catalogsync crates.
//! It provides:
//! - [`CatalogSyncError`] — the unified error type
//! - Catalog wire types ([`RawCatalogResponse`]) and derived shapes
//!   ([`BuiltPackage`], [`PartitionResult`], [`SyncStats`])
//! - Configuration ([`AppConfig`], [`SyncConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, CatalogSettings, OutputConfig, SyncConfig, config_dir,
    config_file_path, effective_api_key, init_config, load_config, load_config_from,
    resolve_api_key,
};
pub use error::{CatalogSyncError, Result};
pub use types::{
    BuiltPackage, CatalogPayload, NormalizedItem, PackageSummary, PartitionResult,
    RawCatalogResponse, RawItem, RawPackage, SyncStats,
};
