use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Languages to fetch subtitles in (ISO codes)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Lookup service settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Subtitle converter settings
    #[serde(default)]
    pub converter: ConverterSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What a batch lookup does when one language fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    // @policy: First failure ends the batch and is returned
    #[default]
    Abort,
    // @policy: Failed languages are logged and left out
    Skip,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(anyhow!("Invalid failure policy: {}", s)),
        }
    }
}

/// Lookup service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    // @field: Lookup endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Per-request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max concurrent requests in a batch
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Batch behaviour on failure
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    // @field: Languages the service is known to serve
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            failure_policy: FailurePolicy::default(),
            languages: default_languages(),
        }
    }
}

impl ProviderSettings {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Subtitle converter configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConverterSettings {
    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Time limit for one conversion in seconds
    #[serde(default = "default_converter_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            timeout_secs: default_converter_timeout_secs(),
        }
    }
}

impl ConverterSettings {
    /// Time limit for one conversion
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "http://napiprojekt.pl/unit_napisy/dl.php".to_string()
}

fn default_user_agent() -> String {
    format!("napiprojekt-rs/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_languages() -> Vec<String> {
    vec!["pl".to_string()]
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_converter_timeout_secs() -> u64 {
    60
}

/// Default location of the configuration file
///
/// `conf.json` in the working directory if present, otherwise
/// `<config dir>/napiprojekt/conf.json`.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from("conf.json");
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|dir| dir.join("napiprojekt").join("conf.json"))
        .unwrap_or(local)
}

impl Config {
    /// Load the configuration at `path`, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load the configuration at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration to `path` as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(anyhow!("At least one language must be configured"));
        }

        // Validate languages
        for language in self.languages.iter().chain(&self.provider.languages) {
            crate::language_utils::normalize_to_part1(language)?;
        }

        Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be greater than zero"));
        }

        if self.provider.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        if self.converter.timeout_secs == 0 {
            return Err(anyhow!("Converter timeout must be greater than zero"));
        }

        if self.converter.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("Converter path must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            languages: default_languages(),
            provider: ProviderSettings::default(),
            converter: ConverterSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}
