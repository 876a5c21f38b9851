use serde::{Deserialize, Serialize};
use sitekeep_core::RemoteConfig;
use std::path::PathBuf;

/// Default debounce delay for non-immediate saves
const DEFAULT_SAVE_DELAY_MS: u64 = 1000;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local cache
    pub cache_dir: ConfigValue<PathBuf>,
    /// Debounce delay for non-immediate saves, in milliseconds
    pub save_delay_ms: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Remote store settings
    pub remote: RemoteConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    cache_dir: Option<PathBuf>,
    save_delay_ms: Option<u64>,
    remote: Option<RemoteConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut cache_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut save_delay_ms = ConfigValue::new(DEFAULT_SAVE_DELAY_MS, ConfigSource::Default);
        let mut config_file = None;
        let mut remote = RemoteConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.cache_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                cache_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(delay) = file_config.save_delay_ms {
                save_delay_ms = ConfigValue::new(delay, ConfigSource::File);
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("SITEKEEP_CACHE_DIR") {
            cache_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(delay) = std::env::var("SITEKEEP_SAVE_DELAY_MS") {
            let delay = delay
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SITEKEEP_SAVE_DELAY_MS", delay))?;
            save_delay_ms = ConfigValue::new(delay, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("SITEKEEP_REMOTE_URL") {
            remote.url = Some(url);
        }
        if let Ok(key) = std::env::var("SITEKEEP_API_KEY") {
            remote.api_key = Some(key);
        }
        if let Ok(secret) = std::env::var("SITEKEEP_ADMIN_SECRET") {
            remote.admin_secret = Some(secret);
        }

        Ok(Self {
            cache_dir,
            save_delay_ms,
            config_file,
            remote,
        })
    }

    /// Copy of the configuration with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.remote.api_key = config.remote.api_key.as_deref().map(mask);
        config.remote.admin_secret = config.remote.admin_secret.as_deref().map(mask);
        config
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/sitekeep/
    /// - macOS: ~/Library/Application Support/sitekeep/
    /// - Windows: %APPDATA%/sitekeep/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitekeep")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/sitekeep/
    /// - macOS: ~/Library/Application Support/sitekeep/
    /// - Windows: %APPDATA%/sitekeep/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sitekeep")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Keeps the first four characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
