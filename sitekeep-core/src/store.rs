//! Persistence facade for the site content document.
//!
//! [`ContentStore`] decides where content is read from and written to:
//!
//! - loads try the remote store, then the local cache, then the built-in
//!   default, and only the remote result is written back to the cache
//! - saves go to the remote store and are always mirrored to the local cache,
//!   so an unreachable remote never loses an edit
//! - non-immediate saves are debounced through a single pending slot, the
//!   last scheduled save wins
//!
//! Remote and cache failures are logged and degraded, never returned. The
//! only fallible operations are [`ContentStore::import`] and
//! [`ContentStore::export`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheError, LocalCache, CACHE_KEY};
use crate::content::{default_content, normalize_block_order, ContentError, SiteContent};
use crate::events::{SaveEvent, SaveEvents};
use crate::fallback::{first_success, Attempt};
use crate::remote::RemoteStore;

/// Delay before a debounced save runs.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(1000);

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Remote,
    Cache,
    Default,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Remote => write!(f, "remote store"),
            ContentSource::Cache => write!(f, "local cache"),
            ContentSource::Default => write!(f, "built-in default"),
        }
    }
}

/// A normalized document and its source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub content: SiteContent,
    pub source: ContentSource,
}

/// Reachability and contents of both stores, each probed independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourcesStatus {
    /// Remote read completed without error
    pub database: bool,
    /// Local cache could be read
    pub local_storage: bool,
    /// Local cache holds a value
    pub has_local_data: bool,
    /// Remote store returned a document
    pub has_database_data: bool,
}

#[derive(Debug, Error)]
enum CacheWriteError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// The debounced save waiting for its timer.
struct PendingSave {
    generation: u64,
    content: SiteContent,
    handle: JoinHandle<()>,
}

/// Loads and saves the site content document.
///
/// Cloning is cheap; clones share the stores, the event channel and the
/// pending save slot.
#[derive(Clone)]
pub struct ContentStore {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    events: SaveEvents,
    default_content: Arc<SiteContent>,
    save_delay: Duration,
    pending: Arc<Mutex<Option<PendingSave>>>,
    generation: Arc<AtomicU64>,
}

impl ContentStore {
    pub fn new(remote: Arc<dyn RemoteStore>, cache: Arc<dyn LocalCache>) -> Self {
        Self {
            remote,
            cache,
            events: SaveEvents::new(),
            default_content: Arc::new(default_content()),
            save_delay: DEFAULT_SAVE_DELAY,
            pending: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = delay;
        self
    }

    /// Replaces the document returned when neither store has content.
    pub fn with_default_content(mut self, content: SiteContent) -> Self {
        self.default_content = Arc::new(content);
        self
    }

    pub fn save_delay(&self) -> Duration {
        self.save_delay
    }

    /// Subscribes to the outcome of every save attempt.
    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Saves `content` now, or after the save delay when `immediate` is false.
    ///
    /// A debounced save replaces any save still waiting for its timer. One
    /// [`SaveEvent`] is emitted per save that actually runs.
    pub async fn save(&self, content: SiteContent, immediate: bool) {
        if immediate {
            self.save_now(&content).await;
        } else {
            self.schedule_save(content);
        }
    }

    /// Runs the pending debounced save right away.
    ///
    /// Returns false when nothing was waiting.
    pub async fn flush(&self) -> bool {
        let pending = self.lock_pending().take();
        match pending {
            Some(pending) => {
                pending.handle.abort();
                debug!(generation = pending.generation, "flushing pending save");
                self.save_now(&pending.content).await;
                true
            }
            None => false,
        }
    }

    /// Returns true while a debounced save is waiting for its timer.
    pub fn has_pending_save(&self) -> bool {
        self.lock_pending().is_some()
    }

    fn schedule_save(&self, content: SiteContent) {
        let mut slot = self.lock_pending();

        if let Some(previous) = slot.take() {
            previous.handle.abort();
            debug!(
                generation = previous.generation,
                "replaced pending save"
            );
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.clone();
        let delay = self.save_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(content) = store.claim_pending(generation) {
                store.save_now(&content).await;
            }
        });

        debug!(generation, delay_ms = delay.as_millis() as u64, "scheduled save");
        *slot = Some(PendingSave {
            generation,
            content,
            handle,
        });
    }

    /// Takes the slot if it still belongs to `generation`. Once taken, the
    /// save can no longer be replaced or aborted.
    fn claim_pending(&self, generation: u64) -> Option<SiteContent> {
        let mut slot = self.lock_pending();
        match slot.as_ref() {
            Some(pending) if pending.generation == generation => {
                slot.take().map(|pending| pending.content)
            }
            _ => None,
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<PendingSave>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn save_now(&self, content: &SiteContent) {
        let event = match self.remote.write_document(content).await {
            Ok(()) => {
                info!("Content saved to remote store");
                match self.write_cache(content) {
                    Ok(()) => SaveEvent::saved(),
                    Err(e) => self.save_last_resort(content, e),
                }
            }
            Err(e) => {
                warn!(error = %e, "Remote save failed, keeping content in local cache");
                match self.write_cache(content) {
                    Ok(()) => SaveEvent::saved_locally(),
                    Err(e) => self.save_last_resort(content, e),
                }
            }
        };

        self.events.emit(event);
    }

    fn save_last_resort(&self, content: &SiteContent, cause: CacheWriteError) -> SaveEvent {
        error!(error = %cause, "Unexpected failure while saving content");
        match self.write_cache(content) {
            Ok(()) => SaveEvent::saved_locally().with_error(cause.to_string()),
            Err(e) => {
                error!(error = %e, "Could not save content to local cache either");
                SaveEvent::failed().with_error(e.to_string())
            }
        }
    }

    fn write_cache(&self, content: &SiteContent) -> Result<(), CacheWriteError> {
        let text = content.to_canonical_json()?;
        self.cache.set(CACHE_KEY, &text)?;
        debug!("local cache updated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Loads the document: remote store, then local cache, then default.
    pub async fn load(&self) -> SiteContent {
        self.load_with_source().await.content
    }

    /// Like [`load`](Self::load), also reporting which source answered.
    pub async fn load_with_source(&self) -> LoadedContent {
        let attempts: Vec<Attempt<'_, LoadedContent>> = vec![
            Box::new(move || self.load_remote().boxed()),
            Box::new(move || {
                async move {
                    self.load_cached(true).map(|content| LoadedContent {
                        content,
                        source: ContentSource::Cache,
                    })
                }
                .boxed()
            }),
        ];

        match first_success(attempts).await {
            Some(loaded) => loaded,
            None => {
                info!("No stored content, using default");
                LoadedContent {
                    content: self.normalized_default(),
                    source: ContentSource::Default,
                }
            }
        }
    }

    /// Loads from the local cache only, falling back to the default.
    pub fn load_sync(&self) -> SiteContent {
        self.load_cached(false)
            .unwrap_or_else(|| self.normalized_default())
    }

    /// Fetches the remote document and overwrites the local cache with it.
    ///
    /// Leaves the cache alone and returns [`load_sync`](Self::load_sync) when
    /// the remote store has nothing.
    pub async fn load_from_database_and_overwrite(&self) -> SiteContent {
        match self.load_remote().await {
            Some(loaded) => loaded.content,
            None => {
                info!("No remote content, keeping local cache");
                self.load_sync()
            }
        }
    }

    async fn load_remote(&self) -> Option<LoadedContent> {
        match self.remote.read_document().await {
            Ok(Some(content)) => {
                let content = normalize_block_order(&content);
                if let Err(e) = self.write_cache(&content) {
                    warn!(error = %e, "Failed to refresh local cache");
                }
                info!("Content loaded from remote store");
                Some(LoadedContent {
                    content,
                    source: ContentSource::Remote,
                })
            }
            Ok(None) => {
                debug!("remote store is empty");
                None
            }
            Err(e) => {
                warn!(error = %e, "Remote store unavailable, trying local cache");
                None
            }
        }
    }

    /// Reads and normalizes the cached document. With `discard_corrupt`, an
    /// entry that fails to parse is deleted.
    fn load_cached(&self, discard_corrupt: bool) -> Option<SiteContent> {
        let text = match self.cache.get(CACHE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Local cache unavailable");
                return None;
            }
        };

        match SiteContent::from_json(&text) {
            Ok(content) => {
                debug!("content loaded from local cache");
                Some(normalize_block_order(&content))
            }
            Err(e) => {
                warn!(error = %e, "Local cache entry is corrupt");
                if discard_corrupt {
                    if let Err(e) = self.cache.remove(CACHE_KEY) {
                        warn!(error = %e, "Failed to remove corrupt cache entry");
                    }
                }
                None
            }
        }
    }

    fn normalized_default(&self) -> SiteContent {
        normalize_block_order(&self.default_content)
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Clears the local cache and returns the default document. The remote
    /// store is left untouched.
    pub fn reset(&self) -> SiteContent {
        if let Err(e) = self.cache.remove(CACHE_KEY) {
            warn!(error = %e, "Failed to clear local cache");
        }
        info!("Local cache cleared");
        self.normalized_default()
    }

    /// Canonical text of [`load_sync`](Self::load_sync), for backups.
    pub fn export(&self) -> Result<String, ContentError> {
        self.load_sync().to_canonical_json()
    }

    /// Parses an exported document.
    ///
    /// Does not normalize or persist the result.
    pub fn import(&self, text: &str) -> Result<SiteContent, ContentError> {
        SiteContent::from_json(text).inspect_err(|e| {
            warn!(error = %e, "Rejected imported content");
        })
    }

    /// Pushes the locally cached document to the remote store.
    pub async fn force_sync_with_database(&self) -> bool {
        let content = self.load_sync();

        match self.remote.write_document(&content).await {
            Ok(()) => {
                if let Err(e) = self.write_cache(&content) {
                    warn!(error = %e, "Failed to refresh local cache after sync");
                }
                info!("Local content pushed to remote store");
                self.events.emit(SaveEvent::saved());
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to push local content to remote store");
                self.events.emit(SaveEvent::failed());
                false
            }
        }
    }

    /// Returns true if a remote read completes, whether or not it finds data.
    pub async fn check_database_connection(&self) -> bool {
        match self.remote.read_document().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Remote store unreachable");
                false
            }
        }
    }

    /// Probes both stores.
    pub async fn data_sources_status(&self) -> DataSourcesStatus {
        let mut status = DataSourcesStatus::default();

        match self.remote.read_document().await {
            Ok(document) => {
                status.database = true;
                status.has_database_data = document.is_some();
            }
            Err(e) => debug!(error = %e, "remote probe failed"),
        }

        match self.cache.get(CACHE_KEY) {
            Ok(value) => {
                status.local_storage = true;
                status.has_local_data = value.is_some_and(|text| !text.is_empty());
            }
            Err(e) => debug!(error = %e, "cache probe failed"),
        }

        status
    }
}
