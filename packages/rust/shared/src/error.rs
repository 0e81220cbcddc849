//! Error types for catalogsync.
//!
//! Library crates use [`CatalogSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all catalogsync operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogSyncError {
    /// Missing or invalid configuration (API key, config file contents).
    #[error("config error: {message}")]
    Config { message: String },

    /// The catalog service could not be reached, or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog service answered with a non-success status.
    /// `status_text` is the server's reason phrase and may be empty.
    #[error("API request failed with status {status}{}", reason_suffix(.status_text))]
    Upstream { status: u16, status_text: String },

    /// The catalog body was not JSON, or not the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Writing one of the sync artifacts failed.
    #[error("failed to write {path:?}: {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem I/O error outside artifact writing (config files).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatalogSyncError>;

fn reason_suffix(status_text: &str) -> String {
    if status_text.is_empty() {
        String::new()
    } else {
        format!(": {status_text}")
    }
}

impl CatalogSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a malformed-response error from any displayable message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Wrap a `std::io::Error` from an artifact write with the failing path.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Network(_) => "network",
            Self::Upstream { .. } => "upstream",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Persistence { .. } => "persistence",
            Self::Io { .. } => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatalogSyncError::config("D-Tools API key not configured");
        assert_eq!(err.to_string(), "config error: D-Tools API key not configured");

        let err = CatalogSyncError::Upstream {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: Internal Server Error"
        );

        let err = CatalogSyncError::Upstream {
            status: 599,
            status_text: String::new(),
        };
        assert_eq!(err.to_string(), "API request failed with status 599");
    }

    #[test]
    fn persistence_error_names_path() {
        let err = CatalogSyncError::persistence(
            "/data/AddOns.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("AddOns.json"));
        assert_eq!(err.kind(), "persistence");
    }
}
