//! Sitekeep Core Library
//!
//! Persists the site content document to a remote store and mirrors it to a
//! local cache, falling back between the two when either is unavailable.

pub mod cache;
pub mod content;
pub mod events;
pub mod fallback;
pub mod remote;
pub mod store;

pub use cache::{CacheError, FileCache, LocalCache, MemoryCache, CACHE_KEY};
pub use content::{default_content, normalize_block_order, Block, ContentError, SiteContent};
pub use events::{SaveEvent, SaveEvents};
pub use remote::{RemoteConfig, RemoteError, RemoteStore, SupabaseClient, DEFAULT_ADMIN_SECRET};
pub use store::{
    ContentSource, ContentStore, DataSourcesStatus, LoadedContent, DEFAULT_SAVE_DELAY,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
