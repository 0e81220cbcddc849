//! Artifact writer.
//!
//! Writes the raw catalog body and both package partitions as pretty-printed
//! JSON into the output directory. Every sync overwrites all three files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use catalogsync_shared::{CatalogPayload, CatalogSyncError, PartitionResult, Result};

/// Raw catalog response, unmodified.
pub const RAW_ARTIFACT: &str = "project-details.json";

/// Standard packages with nested items.
pub const NESTED_ARTIFACT: &str = "packages-nested.json";

/// Add-on packages with nested items.
pub const ADD_ONS_ARTIFACT: &str = "AddOns.json";

/// All artifacts, in write order.
pub const ARTIFACT_FILES: [&str; 3] = [RAW_ARTIFACT, NESTED_ARTIFACT, ADD_ONS_ARTIFACT];

/// Metadata for a single written artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactMeta {
    pub filename: String,
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Write the three sync artifacts into `output_dir`, creating it if needed.
///
/// Files are written one after another, each to a temp file and then renamed
/// over the target. The first failure stops the remaining writes, so earlier
/// artifacts may already be on disk when this returns an error.
#[instrument(skip_all, fields(output_dir = %output_dir.display()))]
pub fn write_artifacts(
    output_dir: &Path,
    payload: &CatalogPayload,
    partitions: &PartitionResult,
) -> Result<Vec<ArtifactMeta>> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| CatalogSyncError::persistence(output_dir, e))?;

    let metas = vec![
        write_json(output_dir, RAW_ARTIFACT, &payload.raw)?,
        write_json(output_dir, NESTED_ARTIFACT, &partitions.standard)?,
        write_json(output_dir, ADD_ONS_ARTIFACT, &partitions.add_ons)?,
    ];

    info!(count = metas.len(), "artifacts written");

    Ok(metas)
}

/// Write one pretty-printed JSON artifact atomically.
fn write_json<T: Serialize + ?Sized>(dir: &Path, filename: &str, data: &T) -> Result<ArtifactMeta> {
    let target = dir.join(filename);
    let temp = dir.join(format!(".{filename}.tmp"));

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| CatalogSyncError::persistence(&target, e.into()))?;

    std::fs::write(&temp, &json).map_err(|e| CatalogSyncError::persistence(&target, e))?;

    if let Err(e) = std::fs::rename(&temp, &target) {
        let _ = std::fs::remove_file(&temp);
        return Err(CatalogSyncError::persistence(&target, e));
    }

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(file = %filename, size = json.len(), %sha256, "wrote artifact");

    Ok(ArtifactMeta {
        filename: filename.to_string(),
        path: target,
        sha256,
        size_bytes: json.len(),
    })
}
