//! HTTP client for the hosted database.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{RemoteConfig, RemoteError, RemoteStore};
use crate::content::SiteContent;

/// Table holding the document row.
const CONTENT_TABLE: &str = "site_content";

/// Id of the single document row.
const CONTENT_ROW_ID: &str = "main";

/// Server function that performs privileged writes.
const SAVE_FUNCTION: &str = "save-content";

/// PostgREST code for "no rows" on single-row queries.
const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    content: &'a SiteContent,
    admin_secret: &'a str,
}

#[derive(Deserialize)]
struct SaveResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ContentRow {
    #[serde(default)]
    content: Option<SiteContent>,
}

#[derive(Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
}

/// Remote store client backed by a Supabase project.
pub struct SupabaseClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl SupabaseClient {
    /// Creates a client. Missing settings are logged; calls made without a
    /// URL fail with [`RemoteError::NotConfigured`].
    pub fn new(config: RemoteConfig) -> Self {
        if !config.is_configured() {
            tracing::error!("Remote store URL or API key missing; remote calls will fail");
        }

        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn base_url(&self) -> Result<&str, RemoteError> {
        self.config
            .url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or(RemoteError::NotConfigured)
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl RemoteStore for SupabaseClient {
    async fn write_document(&self, content: &SiteContent) -> Result<(), RemoteError> {
        let url = format!("{}/functions/v1/{}", self.base_url()?, SAVE_FUNCTION);
        tracing::debug!(%url, "writing document to remote store");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key())
            .json(&SaveRequest {
                content,
                admin_secret: self.config.admin_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: SaveResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        if !result.success {
            return Err(RemoteError::Rejected(
                result.error.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        Ok(())
    }

    async fn read_document(&self) -> Result<Option<SiteContent>, RemoteError> {
        let url = format!("{}/rest/v1/{}", self.base_url()?, CONTENT_TABLE);
        tracing::debug!(%url, "reading document from remote store");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_key())
            .header("apikey", self.api_key())
            .query(&[
                ("select", "content".to_string()),
                ("id", format!("eq.{}", CONTENT_ROW_ID)),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let no_rows = serde_json::from_str::<PostgrestError>(&body)
                .ok()
                .and_then(|e| e.code)
                .is_some_and(|code| code == NO_ROWS_CODE);
            if no_rows {
                tracing::debug!("remote store has no content row");
                return Ok(None);
            }
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<ContentRow> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(rows.into_iter().next().and_then(|row| row.content))
    }
}
