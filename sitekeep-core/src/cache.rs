//! Local key-value cache holding the last known-good document.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the document is cached.
pub const CACHE_KEY: &str = "siteContent";

/// Errors raised by a cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend cannot be used at all (quota, permissions, poisoned state).
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key-value storage.
pub trait LocalCache: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache storing each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path(key);
        fs::write(&path, value).map_err(|source| CacheError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}

/// Process-local cache, gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (FileCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    #[test]
    fn test_path_uses_key() {
        let (cache, _temp) = test_cache();
        assert!(cache.path(CACHE_KEY).ends_with("siteContent.json"));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (cache, _temp) = test_cache();
        assert!(cache.get(CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("cache");
        let cache = FileCache::new(nested.clone());

        cache.set(CACHE_KEY, "{}").unwrap();

        assert!(nested.join("siteContent.json").exists());
    }

    #[test]
    fn test_set_overwrites_and_get_reads_back() {
        let (cache, _temp) = test_cache();

        cache.set(CACHE_KEY, "first").unwrap();
        cache.set(CACHE_KEY, "second").unwrap();

        assert_eq!(cache.get(CACHE_KEY).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let (cache, _temp) = test_cache();
        cache.remove(CACHE_KEY).unwrap();

        cache.set(CACHE_KEY, "value").unwrap();
        cache.remove(CACHE_KEY).unwrap();
        assert!(cache.get(CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_set_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let cache = FileCache::new(blocker);

        let err = cache.set(CACHE_KEY, "value").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        assert!(cache.get(CACHE_KEY).unwrap().is_none());

        cache.set(CACHE_KEY, "value").unwrap();
        assert_eq!(cache.get(CACHE_KEY).unwrap().as_deref(), Some("value"));

        cache.remove(CACHE_KEY).unwrap();
        assert!(cache.get(CACHE_KEY).unwrap().is_none());
    }
}
