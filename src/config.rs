//! Configuration management for Gadget Advisor
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.gadget-advisor/config.toml
//!
//! API keys may also come from `GEMINI_API_KEY` and `RAPIDAPI_KEY`, which take
//! precedence over the file.

use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `gemini.api_key`
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding `news.api_key`
pub const NEWS_KEY_ENV: &str = "RAPIDAPI_KEY";

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Generative backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub request_timeout_secs: u64,
}

/// How literal zeros emitted by the backend are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPolicy {
    /// A literal 0 in a numeric field counts as missing data and fails the attempt
    #[default]
    Reject,
    /// Keep literal zeros and report them as unavailable
    Preserve,
}

/// Product search pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub zero_policy: ZeroPolicy,
    /// Pause before resubmitting; 0 resubmits immediately
    pub retry_delay_ms: u64,
}

/// News API connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub host: String,
    pub api_key: String,
    pub language: String,
    pub topic: String,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: String::new(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            zero_policy: ZeroPolicy::Reject,
            retry_delay_ms: 0,
        }
    }
}

impl SearchConfig {
    /// Total generation calls allowed per search
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            host: "google-news22.p.rapidapi.com".to_string(),
            api_key: String::new(),
            language: "en".to_string(),
            topic: "technology".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.gadget-advisor".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults, then apply environment overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load_stored(path.as_deref())?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Configuration as stored on disk (or the defaults), without environment
    /// overrides. This is what `config --init` writes back.
    pub fn load_stored(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AdvisorError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".gadget-advisor").join("config.toml"))
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(GEMINI_KEY_ENV).ok(),
            std::env::var(NEWS_KEY_ENV).ok(),
        );
    }

    /// Replace API keys with non-empty overrides
    pub fn apply_overrides(&mut self, gemini_key: Option<String>, news_key: Option<String>) {
        if let Some(key) = gemini_key.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = key;
        }
        if let Some(key) = news_key.filter(|k| !k.trim().is_empty()) {
            self.news.api_key = key;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(AdvisorError::Config("gemini.model must not be empty".to_string()));
        }

        if self.gemini.request_timeout_secs == 0 {
            return Err(AdvisorError::Config(
                "gemini.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.search.max_retries > 10 {
            return Err(AdvisorError::Config(format!(
                "search.max_retries must be at most 10, got {}",
                self.search.max_retries
            )));
        }

        if self.news.host.trim().is_empty() {
            return Err(AdvisorError::Config("news.host must not be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AdvisorError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AdvisorError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }
}
