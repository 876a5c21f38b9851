//! Commands reading and writing the site content document.

use clap::Args;
use std::path::{Path, PathBuf};

use sitekeep_core::{normalize_block_order, ContentError, ContentStore, SaveEvent, SiteContent};

use super::print_save_event;

/// Load the site content and print it
#[derive(Debug, Args)]
pub struct LoadCommand {
    /// Read the local cache only, without contacting the remote store
    #[arg(long)]
    offline: bool,
}

impl LoadCommand {
    pub async fn run(&self, store: &ContentStore) -> Result<(), ContentCommandError> {
        let content = if self.offline {
            eprintln!("Source: local cache (offline)");
            store.load_sync()
        } else {
            let loaded = store.load_with_source().await;
            eprintln!("Source: {}", loaded.source);
            loaded.content
        };

        println!("{}", content.to_canonical_json()?);
        Ok(())
    }
}

/// Save a content file to the remote store and local cache
#[derive(Debug, Args)]
pub struct SaveCommand {
    /// JSON file with the site content
    file: PathBuf,

    /// Debounce the save instead of writing immediately (Ctrl-C saves now)
    #[arg(long)]
    debounce: bool,
}

impl SaveCommand {
    pub async fn run(&self, store: &ContentStore) -> Result<(), ContentCommandError> {
        let content = read_content(store, &self.file)?;
        let mut events = store.subscribe();

        store.save(content, !self.debounce).await;

        if self.debounce {
            println!(
                "Save scheduled in {} ms (Ctrl-C to save now)...",
                store.save_delay().as_millis()
            );
            tokio::select! {
                event = events.recv() => return report(event.ok()),
                _ = tokio::signal::ctrl_c() => {
                    store.flush().await;
                }
            }
        }

        report(events.recv().await.ok())
    }
}

/// Clear the local cache (the remote store is not touched)
#[derive(Debug, Args)]
pub struct ResetCommand {}

impl ResetCommand {
    pub fn run(&self, store: &ContentStore) -> Result<(), ContentCommandError> {
        store.reset();
        println!("Local cache cleared. Default content will be used until the next save or load.");
        Ok(())
    }
}

/// Export the cached content as canonical JSON
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(&self, store: &ContentStore) -> Result<(), ContentCommandError> {
        let text = store.export()?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, text)
                    .map_err(|e| ContentCommandError::Io(path.clone(), e))?;
                println!("Exported content to {}", path.display());
            }
            None => println!("{}", text),
        }

        Ok(())
    }
}

/// Validate an exported content file, optionally saving it
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file produced by `sitekeep export`
    file: PathBuf,

    /// Normalize and save the imported content immediately
    #[arg(long)]
    save: bool,
}

impl ImportCommand {
    pub async fn run(&self, store: &ContentStore) -> Result<(), ContentCommandError> {
        let content = read_content(store, &self.file)?;
        println!(
            "✓ {} is valid ({} block{})",
            self.file.display(),
            content.blocks.len(),
            if content.blocks.len() == 1 { "" } else { "s" }
        );

        if !self.save {
            return Ok(());
        }

        let mut events = store.subscribe();
        store.save(normalize_block_order(&content), true).await;
        report(events.recv().await.ok())
    }
}

fn read_content(store: &ContentStore, path: &Path) -> Result<SiteContent, ContentCommandError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ContentCommandError::Io(path.to_path_buf(), e))?;
    Ok(store.import(&text)?)
}

fn report(event: Option<SaveEvent>) -> Result<(), ContentCommandError> {
    let event = event.ok_or(ContentCommandError::NoSaveOutcome)?;
    print_save_event(&event);
    Ok(())
}

#[derive(Debug)]
pub enum ContentCommandError {
    Io(PathBuf, std::io::Error),
    Content(ContentError),
    NoSaveOutcome,
}

impl std::fmt::Display for ContentCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentCommandError::Io(path, e) => write!(f, "{}: {}", path.display(), e),
            ContentCommandError::Content(e) => write!(f, "{}", e),
            ContentCommandError::NoSaveOutcome => write!(f, "Save finished without reporting an outcome"),
        }
    }
}

impl std::error::Error for ContentCommandError {}

impl From<ContentError> for ContentCommandError {
    fn from(e: ContentError) -> Self {
        ContentCommandError::Content(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekeep_core::{FileCache, LocalCache, RemoteConfig, SupabaseClient, CACHE_KEY};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn offline_store(dir: &Path) -> ContentStore {
        let remote = Arc::new(SupabaseClient::new(RemoteConfig::default()));
        let cache = Arc::new(FileCache::new(dir.to_path_buf()));
        ContentStore::new(remote, cache)
    }

    #[tokio::test]
    async fn test_save_without_remote_keeps_file_in_cache() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("content.json");
        std::fs::write(
            &file,
            r#"{"blocks": [{"id": "hero", "type": "hero", "order": 4}]}"#,
        )
        .unwrap();
        let store = offline_store(&temp_dir.path().join("cache"));

        let cmd = SaveCommand {
            file,
            debounce: false,
        };
        cmd.run(&store).await.unwrap();

        let cached = FileCache::new(temp_dir.path().join("cache"))
            .get(CACHE_KEY)
            .unwrap()
            .unwrap();
        let content = SiteContent::from_json(&cached).unwrap();
        assert_eq!(content.blocks[0].order_i64(), Some(4));
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("broken.json");
        std::fs::write(&file, "{ broken").unwrap();
        let store = offline_store(temp_dir.path());

        let cmd = ImportCommand { file, save: true };
        let err = cmd.run(&store).await.unwrap_err();

        assert!(matches!(err, ContentCommandError::Content(_)));
        assert!(err.to_string().contains("Invalid JSON format"));
    }

    #[test]
    fn test_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("backup.json");
        let store = offline_store(temp_dir.path());

        let cmd = ExportCommand {
            output: Some(output.clone()),
        };
        cmd.run(&store).unwrap();

        let text = std::fs::read_to_string(output).unwrap();
        assert!(SiteContent::from_json(&text).unwrap().block("hero").is_some());
    }
}
