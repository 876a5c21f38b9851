use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sitekeep_core::{ContentStore, FileCache, SupabaseClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    ConfigCommand, ExportCommand, ImportCommand, LoadCommand, ResetCommand, SaveCommand,
    SyncCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "sitekeep")]
#[command(version)]
#[command(about = "Keeps site content in a remote store with a local cache fallback", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load site content (remote store, then local cache, then default)
    Load(LoadCommand),

    /// Save site content from a file
    Save(SaveCommand),

    /// Clear the local cache
    Reset(ResetCommand),

    /// Export cached content for backup
    Export(ExportCommand),

    /// Validate (and optionally save) an exported file
    Import(ImportCommand),

    /// Sync with the remote store
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitekeep=warn,sitekeep_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    tracing::debug!(config_file = ?config.config_file, "configuration loaded");

    match cli.command {
        Some(Commands::Load(cmd)) => cmd.run(&build_store(&config)).await?,
        Some(Commands::Save(cmd)) => cmd.run(&build_store(&config)).await?,
        Some(Commands::Reset(cmd)) => cmd.run(&build_store(&config))?,
        Some(Commands::Export(cmd)) => cmd.run(&build_store(&config))?,
        Some(Commands::Import(cmd)) => cmd.run(&build_store(&config)).await?,
        Some(Commands::Sync(cmd)) => cmd.run(&build_store(&config), &config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn build_store(config: &Config) -> ContentStore {
    let remote = Arc::new(SupabaseClient::new(config.remote.clone()));
    let cache = Arc::new(FileCache::new(config.cache_dir.value.clone()));

    ContentStore::new(remote, cache)
        .with_save_delay(Duration::from_millis(config.save_delay_ms.value))
}
