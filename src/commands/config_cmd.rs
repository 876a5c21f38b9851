use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;

use crate::config::Config;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let config = config.redacted();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("cache_dir: {}", config.cache_dir.value.display());
                        println!("  source: {}", config.cache_dir.source);
                        println!();

                        println!("save_delay_ms: {}", config.save_delay_ms.value);
                        println!("  source: {}", config.save_delay_ms.source);
                        println!();

                        println!("remote:");
                        println!("  url: {}", config.remote.url.as_deref().unwrap_or("(not set)"));
                        println!(
                            "  api_key: {}",
                            config.remote.api_key.as_deref().unwrap_or("(not set)")
                        );
                        println!(
                            "  admin_secret: {}",
                            config
                                .remote
                                .admin_secret
                                .as_deref()
                                .unwrap_or("(built-in default)")
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'sitekeep config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let default_config = r#"# sitekeep configuration

# Directory for the local content cache
# cache_dir: ~/.local/share/sitekeep

# Delay before a debounced save is sent, in milliseconds
save_delay_ms: 1000

remote:
  # url: https://your-project.supabase.co
  # api_key: your-public-api-key
  # admin_secret: your-admin-secret
"#;

                let mut file = fs::File::create(&config_path)?;
                file.write_all(default_config.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
