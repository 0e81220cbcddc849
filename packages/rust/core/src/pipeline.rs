//! End-to-end sync: fetch → build → partition → persist → stats.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use catalogsync_client::CatalogClient;
use catalogsync_shared::{CatalogSyncError, PackageSummary, Result, SyncConfig, SyncStats};

use crate::builder::{build_packages, summarize_packages};
use crate::partition::partition;
use crate::persist::{ARTIFACT_FILES, ArtifactMeta, write_artifacts};
use crate::stats::compute_stats;

/// Message returned to callers after a successful sync.
pub const SUCCESS_MESSAGE: &str = "✅ All files saved successfully!";

// ---------------------------------------------------------------------------
// States, reports, outcomes
// ---------------------------------------------------------------------------

/// Where a sync run currently is. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Transforming,
    Persisting,
    Done,
    Failed,
}

impl SyncState {
    /// Human-readable label for progress output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Fetching => "Fetching project from catalog",
            Self::Transforming => "Building packages",
            Self::Persisting => "Writing artifacts",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a completed sync run.
#[derive(Debug)]
pub struct SyncReport {
    /// Package and item counts.
    pub stats: SyncStats,
    /// Written artifacts, in write order.
    pub artifacts: Vec<ArtifactMeta>,
    /// Item count per catalog package.
    pub summaries: Vec<PackageSummary>,
    /// Directory the artifacts were written to.
    pub output_dir: PathBuf,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// What a trigger reports back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SyncOutcome {
    Success {
        message: String,
        files: Vec<String>,
        stats: SyncStats,
    },
    Failure {
        error: String,
    },
}

impl SyncOutcome {
    /// Success outcome with the fixed artifact list.
    pub fn success(stats: SyncStats) -> Self {
        Self::Success {
            message: SUCCESS_MESSAGE.to_string(),
            files: ARTIFACT_FILES.iter().map(|f| (*f).to_string()).collect(),
            stats,
        }
    }

    /// Failure outcome carrying the error's message.
    pub fn failure(error: &CatalogSyncError) -> Self {
        Self::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting sync status.
pub trait ProgressReporter: Send + Sync {
    /// Called on every state transition.
    fn state(&self, state: SyncState);
    /// Called when the run completes successfully.
    fn done(&self, report: &SyncReport);
    /// Called when the run fails.
    fn failed(&self, error: &CatalogSyncError);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn state(&self, _state: SyncState) {}
    fn done(&self, _report: &SyncReport) {}
    fn failed(&self, _error: &CatalogSyncError) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs one sync per call. Clones share a guard, so overlapping runs through
/// the same orchestrator execute one after another instead of racing on the
/// artifact files.
#[derive(Debug, Clone)]
pub struct SyncOrchestrator {
    config: SyncConfig,
    guard: Arc<Mutex<()>>,
}

impl SyncOrchestrator {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Run the sync and convert the result into a caller-facing outcome.
    pub async fn run_sync(&self, progress: &dyn ProgressReporter) -> SyncOutcome {
        match self.run(progress).await {
            Ok(report) => SyncOutcome::success(report.stats),
            Err(e) => SyncOutcome::failure(&e),
        }
    }

    /// Run the full sync pipeline.
    ///
    /// 1. Fetch the project from the catalog
    /// 2. Nest items under packages and split off add-ons
    /// 3. Write the three artifacts
    /// 4. Count packages and items
    ///
    /// The first failing step ends the run; nothing after it is attempted.
    #[instrument(skip_all, fields(output_dir = %self.config.output_dir.display()))]
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<SyncReport> {
        let _running = self.guard.lock().await;
        let start = Instant::now();
        let mut state = SyncState::Idle;

        match self.execute(&mut state, progress, start).await {
            Ok(report) => {
                advance(&mut state, SyncState::Done, progress);
                progress.done(&report);

                info!(
                    packages = report.stats.package_count,
                    addons = report.stats.add_on_count,
                    total_items = report.stats.total_item_count,
                    elapsed_ms = report.elapsed.as_millis(),
                    "sync complete"
                );

                Ok(report)
            }
            Err(e) => {
                warn!(step = %state, kind = e.kind(), error = %e, "sync failed");
                advance(&mut state, SyncState::Failed, progress);
                progress.failed(&e);
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        state: &mut SyncState,
        progress: &dyn ProgressReporter,
        start: Instant,
    ) -> Result<SyncReport> {
        // --- Fetch ---
        advance(state, SyncState::Fetching, progress);
        let client = CatalogClient::new(self.config.catalog.clone())?;
        let payload = client.fetch_project().await?;

        // --- Transform ---
        advance(state, SyncState::Transforming, progress);
        let summaries = summarize_packages(&payload.catalog);
        let partitions = partition(build_packages(&payload.catalog));

        // --- Persist ---
        advance(state, SyncState::Persisting, progress);
        let artifacts = write_artifacts(&self.config.output_dir, &payload, &partitions)?;

        Ok(SyncReport {
            stats: compute_stats(&partitions),
            artifacts,
            summaries,
            output_dir: self.config.output_dir.clone(),
            elapsed: start.elapsed(),
        })
    }
}

fn advance(state: &mut SyncState, next: SyncState, progress: &dyn ProgressReporter) {
    debug!(from = %state, to = %next, "sync state transition");
    *state = next;
    progress.state(next);
}
