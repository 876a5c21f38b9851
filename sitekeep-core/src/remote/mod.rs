//! Remote document store.
//!
//! The remote side is a hosted database holding a single row with id
//! `main`. Reads go through its REST interface; writes go through a server
//! function that checks an admin secret before updating the row.

mod client;
mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::SiteContent;

pub use client::SupabaseClient;
pub use error::RemoteError;

/// Admin secret used when none is configured.
pub const DEFAULT_ADMIN_SECRET: &str = "sitekeep_admin_secret";

/// Connection settings for the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the hosted project (e.g. "https://abc.supabase.co")
    pub url: Option<String>,
    /// Public API key sent as bearer credential
    pub api_key: Option<String>,
    /// Shared secret checked by the save function
    pub admin_secret: Option<String>,
}

impl RemoteConfig {
    /// Returns true if both the URL and the API key are present.
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    pub fn admin_secret(&self) -> &str {
        self.admin_secret.as_deref().unwrap_or(DEFAULT_ADMIN_SECRET)
    }
}

/// Read/write access to the remote copy of the document.
///
/// Implementations report a missing row as `Ok(None)` and every other fault
/// as an error. They do not retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn write_document(&self, content: &SiteContent) -> Result<(), RemoteError>;

    async fn read_document(&self) -> Result<Option<SiteContent>, RemoteError>;
}
