//! Core sync pipeline and domain logic for catalogsync.
//!
//! This crate ties together the catalog fetch, item normalization, package
//! nesting, add-on partitioning, and artifact persistence into one end-to-end
//! workflow ([`pipeline::SyncOrchestrator`]).

pub mod builder;
pub mod normalize;
pub mod partition;
pub mod persist;
pub mod pipeline;
pub mod stats;
