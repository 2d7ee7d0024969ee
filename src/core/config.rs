//! Configuration management for verbal-crew
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/verbal-crew/config.toml

use serde::Deserialize;
use tracing::warn;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{CrewError, Result};
use crate::llm::RetryPolicy;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Gemini API access
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Agent loop defaults
    #[serde(default)]
    pub agent: AgentConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (GEMINI_API_KEY, then GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Base URL without version segment
    pub base_url: String,
    /// API version path segment
    pub api_version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier used by every agent unless overridden
    /// Default: gemini-2.0-flash-001
    pub model: String,
    /// Iteration budget per task
    /// Default: 5
    pub max_iterations: usize,
    /// Attempt ceiling for a single model call
    /// Default: 5
    pub retry_attempts: usize,
    /// Fixed delay between attempts in milliseconds
    /// Default: 1000
    pub retry_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .ok(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_version: "v1".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: env::var("CREW_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-001".to_string()),
            max_iterations: 5,
            retry_attempts: 5,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env::var("CREW_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl AgentConfig {
    /// Retry policy for model calls
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay_ms),
        )
    }
}

impl GeminiConfig {
    /// Versioned API root, e.g. https://generativelanguage.googleapis.com/v1
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("verbal-crew")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::load_or_default(&Self::config_file())
    }

    /// Load `path` if it exists, otherwise defaults (which respect env vars).
    /// A file that fails to parse is logged and skipped.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CrewError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CrewError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CrewError::config(format!("Failed to parse config: {}", e)))
    }

    /// API key or a configuration error naming the variables to set
    pub fn require_api_key(&self) -> Result<&str> {
        self.gemini
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CrewError::config("GEMINI_API_KEY (or GOOGLE_API_KEY) not set"))
    }
}
