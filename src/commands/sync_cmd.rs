//! Sync commands moving content between the local cache and the remote store.

use clap::{Args, Subcommand};

use sitekeep_core::ContentStore;

use crate::config::Config;

/// Sync with the remote store (pushes the local cache by default)
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Overwrite the local cache with the remote document
    Pull,
    /// Show remote and local cache status
    Status,
    /// Check that the remote store answers
    Check,
}

impl SyncCommand {
    pub async fn run(
        &self,
        store: &ContentStore,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None => self.push(store).await,
            Some(SyncSubcommand::Pull) => self.pull(store).await,
            Some(SyncSubcommand::Status) => self.status(store, config).await,
            Some(SyncSubcommand::Check) => self.check(store).await,
        }
    }

    async fn check(&self, store: &ContentStore) -> Result<(), Box<dyn std::error::Error>> {
        if store.check_database_connection().await {
            println!("✓ remote store reachable");
            Ok(())
        } else {
            Err("Remote store unreachable".into())
        }
    }

    async fn push(&self, store: &ContentStore) -> Result<(), Box<dyn std::error::Error>> {
        println!("Pushing local content to remote store...");

        if store.force_sync_with_database().await {
            println!("✓ remote store updated");
            Ok(())
        } else {
            Err("Failed to push content to remote store".into())
        }
    }

    async fn pull(&self, store: &ContentStore) -> Result<(), Box<dyn std::error::Error>> {
        let before = store.load_sync();
        let after = store.load_from_database_and_overwrite().await;

        if before == after {
            println!("✓ local cache up to date");
        } else {
            println!("✓ local cache updated ({} blocks)", after.blocks.len());
        }
        Ok(())
    }

    async fn status(
        &self,
        store: &ContentStore,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("Data Sources");
        println!("============");
        println!();

        match &config.remote.url {
            Some(url) => println!("Remote:      {}", url),
            None => println!("Remote:      not configured"),
        }
        println!("Local cache: {}", config.cache_dir.value.display());
        println!();

        let status = store.data_sources_status().await;

        println!(
            "Remote store: {}",
            match (status.database, status.has_database_data) {
                (true, true) => "✓ connected, has content",
                (true, false) => "✓ connected, empty",
                (false, _) => "✗ unreachable",
            }
        );
        println!(
            "Local cache:  {}",
            match (status.local_storage, status.has_local_data) {
                (true, true) => "✓ available, has content",
                (true, false) => "✓ available, empty",
                (false, _) => "✗ unavailable",
            }
        );

        if !config.remote.is_configured() {
            println!();
            println!("To enable the remote store, set environment variables:");
            println!("  SITEKEEP_REMOTE_URL");
            println!("  SITEKEEP_API_KEY");
        }

        Ok(())
    }
}
