//! Application configuration for catalogsync.
//!
//! User config lives at `~/.catalogsync/catalogsync.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogSyncError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "catalogsync.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".catalogsync";

// ---------------------------------------------------------------------------
// Config structs (matching catalogsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Artifact output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Projects endpoint of the catalog API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Project whose bill-of-materials is synced.
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project_id: default_project_id(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.d-tools.com/SI/Subscribe/Projects".into()
}
fn default_project_id() -> String {
    "6a212c7d-c5fc-4951-91f1-b762a99d8502".into()
}
fn default_api_key_env() -> String {
    "DTOOLS_API_KEY".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the three artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "src/data".into()
}

// ---------------------------------------------------------------------------
// Runtime config (merged from config file + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved connection settings for the catalog client.
#[derive(Clone)]
pub struct CatalogSettings {
    /// Projects endpoint.
    pub base_url: Url,
    /// Project identifier sent as the `id` query parameter.
    pub project_id: String,
    /// API key, if one was configured. Validated by the client, not here.
    pub api_key: Option<String>,
}

impl fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("base_url", &self.base_url.as_str())
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything one sync invocation needs, passed explicitly to the orchestrator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Catalog connection settings.
    pub catalog: CatalogSettings,
    /// Directory receiving the artifacts.
    pub output_dir: PathBuf,
}

impl SyncConfig {
    /// Merge the file config with CLI overrides.
    ///
    /// `api_key` falls back to the env var named in `[catalog].api_key_env`;
    /// `output_dir` falls back to `[output].dir`.
    pub fn resolve(
        config: &AppConfig,
        api_key: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.catalog.base_url).map_err(|e| {
            CatalogSyncError::config(format!(
                "invalid catalog base_url '{}': {e}",
                config.catalog.base_url
            ))
        })?;

        let api_key = effective_api_key(config, api_key);

        Ok(Self {
            catalog: CatalogSettings {
                base_url,
                project_id: config.catalog.project_id.clone(),
                api_key,
            },
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(&config.output.dir)),
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.catalogsync/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogSyncError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.catalogsync/catalogsync.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogSyncError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CatalogSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogSyncError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogSyncError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogSyncError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API key from the env var named in the config. Empty counts as unset.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    std::env::var(&config.catalog.api_key_env)
        .ok()
        .filter(|val| !val.is_empty())
}

/// The key a sync would use: an explicit (flag or `DTOOLS_API_KEY`) key wins,
/// then the env var named in the config. Empty counts as unset.
pub fn effective_api_key(config: &AppConfig, explicit: Option<String>) -> Option<String> {
    explicit
        .filter(|k| !k.is_empty())
        .or_else(|| resolve_api_key(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("DTOOLS_API_KEY"));
        assert!(toml_str.contains("src/data"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[output]
dir = "/tmp/catalog"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.dir, "/tmp/catalog");
        assert_eq!(config.catalog.api_key_env, "DTOOLS_API_KEY");
        assert_eq!(
            config.catalog.project_id,
            "6a212c7d-c5fc-4951-91f1-b762a99d8502"
        );
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("cs-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[catalog]\nproject_id = \"abc\"\napi_key_env = \"CS_TEST_KEY\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.catalog.project_id, "abc");
        assert_eq!(config.catalog.api_key_env, "CS_TEST_KEY");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_config_rejects_bad_toml() {
        let dir = std::env::temp_dir().join(format!("cs-config-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[catalog\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn resolve_prefers_explicit_overrides() {
        let mut config = AppConfig::default();
        config.catalog.api_key_env = "CS_TEST_NONEXISTENT_KEY_12345".into();

        let resolved = SyncConfig::resolve(
            &config,
            Some("secret".into()),
            Some(PathBuf::from("/tmp/out")),
        )
        .unwrap();
        assert_eq!(resolved.catalog.api_key.as_deref(), Some("secret"));
        assert_eq!(resolved.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn resolve_without_key_leaves_it_unset() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.catalog.api_key_env = "CS_TEST_NONEXISTENT_KEY_12345".into();

        let resolved = SyncConfig::resolve(&config, Some(String::new()), None).unwrap();
        assert!(resolved.catalog.api_key.is_none());
        assert_eq!(resolved.output_dir, PathBuf::from("src/data"));
    }

    #[test]
    fn resolve_rejects_invalid_base_url() {
        let mut config = AppConfig::default();
        config.catalog.base_url = "not a url".into();
        let err = SyncConfig::resolve(&config, None, None).unwrap_err();
        assert!(err.to_string().contains("invalid catalog base_url"));
    }

    #[test]
    fn explicit_key_counts_without_config_env() {
        let mut config = AppConfig::default();
        config.catalog.api_key_env = "CS_TEST_NONEXISTENT_KEY_12345".into();

        assert_eq!(effective_api_key(&config, None), None);
        assert_eq!(effective_api_key(&config, Some(String::new())), None);
        assert_eq!(
            effective_api_key(&config, Some("k".into())).as_deref(),
            Some("k")
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = CatalogSettings {
            base_url: Url::parse("https://example.com/Projects").unwrap(),
            project_id: "p".into(),
            api_key: Some("super-secret".into()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
