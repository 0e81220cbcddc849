//! HTTP client for the remote catalog service.
//!
//! One authenticated GET per sync: the project's packages and items come back
//! as a single JSON document. There is no retry and no timeout beyond the
//! transport default.

use catalogsync_shared::{CatalogPayload, CatalogSettings, CatalogSyncError, Result};
use hyper::ext::ReasonPhrase;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

/// Header carrying the catalog API key.
pub const API_KEY_HEADER: &str = "X-DTSI-ApiKey";

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("catalogsync/", env!("CARGO_PKG_VERSION"));

/// Client for the catalog projects endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    settings: CatalogSettings,
    client: Client,
}

impl CatalogClient {
    /// Create a client for the given settings.
    pub fn new(settings: CatalogSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CatalogSyncError::Network(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { settings, client })
    }

    /// Full request URL including the project query parameters.
    pub fn project_url(&self) -> Url {
        let mut url = self.settings.base_url.clone();
        url.query_pairs_mut()
            .append_pair("id", &self.settings.project_id)
            .append_pair("aggregateBy", "false")
            .append_pair("getAdjustmentsByItem", "true");
        url
    }

    /// Fetch the project's packages and items.
    ///
    /// Fails with a config error before touching the network if no API key is
    /// set. A non-success status is reported as [`CatalogSyncError::Upstream`]
    /// without reading the body.
    #[instrument(skip_all, fields(project_id = %self.settings.project_id))]
    pub async fn fetch_project(&self) -> Result<CatalogPayload> {
        let api_key = match self.settings.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(CatalogSyncError::config("D-Tools API key not configured")),
        };
        let api_key = HeaderValue::from_str(api_key)
            .map_err(|_| CatalogSyncError::config("API key contains invalid header characters"))?;

        let url = self.project_url();
        info!(url = %self.settings.base_url, "fetching project from catalog");

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| CatalogSyncError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogSyncError::Upstream {
                status: status.as_u16(),
                status_text: status_text(status, response.extensions().get::<ReasonPhrase>()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogSyncError::Network(format!("failed to read body: {e}")))?;

        debug!(bytes = body.len(), "catalog response received");

        let raw: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| CatalogSyncError::malformed(format!("response is not valid JSON: {e}")))?;

        CatalogPayload::from_json(raw)
    }
}

/// Reason phrase the server sent, or the canonical one when the server sent
/// the standard phrase (the transport only records non-standard phrases).
/// Empty when neither exists.
fn status_text(status: StatusCode, reason: Option<&ReasonPhrase>) -> String {
    match reason {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).trim().to_string(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    }
}
