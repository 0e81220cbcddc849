//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::process::ExitCode;

use catalogsync_core::pipeline::{
    ProgressReporter, SyncOrchestrator, SyncOutcome, SyncReport, SyncState,
};
use catalogsync_shared::{
    AppConfig, CatalogSyncError, SyncConfig, effective_api_key, init_config, load_config,
    load_config_from,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// catalogsync — sync a project's packages and items from the catalog service.
#[derive(Parser)]
#[command(
    name = "catalogsync",
    version,
    about = "Fetch a project's bill-of-materials and write nested package JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.catalogsync/catalogsync.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch the project and write the three JSON artifacts.
    Sync {
        /// Output directory for the artifacts (defaults to [output].dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Catalog API key (defaults to the env var named by [catalog].api_key_env).
        #[arg(long, env = "DTOOLS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print the outcome as JSON instead of a text summary.
        #[arg(long)]
        json: bool,

        /// Also list every package with its item count.
        #[arg(long, conflicts_with = "json")]
        summary: bool,
    },

    /// Show resolved sync settings and whether an API key is available.
    Status {
        /// Catalog API key to check (same sources as `sync`).
        #[arg(long, env = "DTOOLS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so `--json`
/// output on stdout stays parseable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "catalogsync=info",
        1 => "catalogsync=debug",
        _ => "catalogsync=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Sync {
            out,
            api_key,
            json,
            summary,
        } => cmd_sync(&config, api_key, out, json, summary).await,
        Command::Status { api_key, json } => cmd_status(&config, api_key, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sync(
    config: &AppConfig,
    api_key: Option<String>,
    out: Option<PathBuf>,
    json: bool,
    summary: bool,
) -> Result<ExitCode> {
    let sync_config = SyncConfig::resolve(config, api_key, out)?;

    info!(
        project_id = %sync_config.catalog.project_id,
        output_dir = %sync_config.output_dir.display(),
        "starting sync"
    );

    let orchestrator = SyncOrchestrator::new(sync_config);

    if json {
        let outcome = orchestrator.run_sync(&CliProgress::new()).await;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(match outcome {
            SyncOutcome::Success { .. } => ExitCode::SUCCESS,
            SyncOutcome::Failure { .. } => ExitCode::FAILURE,
        });
    }

    let report = orchestrator
        .run(&CliProgress::new())
        .await
        .map_err(|e| eyre!("sync failed: {e}"))?;

    println!();
    println!("  Sync complete!");
    println!("  Packages:    {}", report.stats.package_count);
    println!("  Add-ons:     {}", report.stats.add_on_count);
    println!("  Total items: {}", report.stats.total_item_count);
    println!("  Output:      {}", report.output_dir.display());
    for artifact in &report.artifacts {
        println!("    {} ({} bytes)", artifact.path.display(), artifact.size_bytes);
    }
    println!("  Time:        {:.1}s", report.elapsed.as_secs_f64());

    if summary {
        println!();
        for pkg in &report.summaries {
            println!(
                "  {:>4}  {}",
                pkg.item_count,
                if pkg.name().is_empty() {
                    "(unnamed)"
                } else {
                    pkg.name()
                }
            );
        }
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

fn cmd_status(config: &AppConfig, api_key: Option<String>, json: bool) -> Result<ExitCode> {
    let key_state = api_key_state(config, api_key);
    let cwd = std::env::current_dir()
        .map_err(|e| eyre!("cannot determine working directory: {e}"))?;

    if json {
        let status = serde_json::json!({
            "apiKey": key_state,
            "apiKeyEnv": config.catalog.api_key_env,
            "baseUrl": config.catalog.base_url,
            "projectId": config.catalog.project_id,
            "outputDir": config.output.dir,
            "cwd": cwd,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("  API key:    {key_state} (${})", config.catalog.api_key_env);
        println!("  Catalog:    {}", config.catalog.base_url);
        println!("  Project:    {}", config.catalog.project_id);
        println!("  Output dir: {}", config.output.dir);
        println!("  Cwd:        {}", cwd.display());
    }

    Ok(ExitCode::SUCCESS)
}

/// Whether `sync` would find a key, using its precedence.
fn api_key_state(config: &AppConfig, api_key: Option<String>) -> &'static str {
    if effective_api_key(config, api_key).is_some() {
        "set"
    } else {
        "not set"
    }
}

fn cmd_config_init() -> Result<ExitCode> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_show(config: &AppConfig) -> Result<ExitCode> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn state(&self, state: SyncState) {
        self.spinner.set_message(state.label());
    }

    fn done(&self, _report: &SyncReport) {
        self.spinner.finish_and_clear();
    }

    fn failed(&self, _error: &CatalogSyncError) {
        self.spinner.finish_and_clear();
    }
}
