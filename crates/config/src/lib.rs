//! Configuration loading and validation for AgentKata.
//!
//! Loads configuration from `~/.agentkata/config.toml` with environment
//! variable overrides. The resulting [`KataConfig`] is built once at process
//! start and passed explicitly to every component that needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agentkata/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct KataConfig {
    /// API key for the default provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Anthropic key, used when `default_provider = "anthropic"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Base URL override for the default provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Directory holding conversation fixtures (`*.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,

    /// Classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Router settings
    #[serde(default)]
    pub router: RouterConfig,

    /// Retrieval service settings
    #[serde(default)]
    pub retriever: RetrieverConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for KataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KataConfig")
            .field("api_key", &redact(&self.api_key))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("default_provider", &self.default_provider)
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("classifier", &self.classifier)
            .field("router", &self.router)
            .field("retriever", &self.retriever)
            .field("fixtures_dir", &self.fixtures_dir)
            .finish()
    }
}

/// How the classifier talks to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Attempts allowed before giving up on malformed structured output
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound on one classify call, retries included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature for classification (low = more stable routing)
    #[serde(default = "default_classifier_temperature")]
    pub temperature: f32,

    /// Model override; falls back to `default_model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_classifier_temperature() -> f32 {
    0.0
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            temperature: default_classifier_temperature(),
            model: None,
        }
    }
}

/// Router dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// "mock" synthesizes placeholder responses, "live" invokes the tools
    #[serde(default = "default_dispatch")]
    pub dispatch: String,
}

fn default_dispatch() -> String {
    "mock".into()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            dispatch: default_dispatch(),
        }
    }
}

/// Remote nearest-neighbor text search (ColBERTv2) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    #[serde(default = "default_retriever_url")]
    pub url: String,

    /// Use POST with a JSON body instead of GET query parameters
    #[serde(default)]
    pub post_requests: bool,

    /// Passages returned per query (server caps this at 100)
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_retriever_timeout")]
    pub timeout_secs: u64,
}

fn default_retriever_url() -> String {
    "http://20.102.90.50:2017/wiki17_abstracts".into()
}
fn default_k() -> usize {
    3
}
fn default_retriever_timeout() -> u64 {
    10
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            url: default_retriever_url(),
            post_requests: false,
            k: default_k(),
            timeout_secs: default_retriever_timeout(),
        }
    }
}

impl KataConfig {
    /// Load configuration from the default path (~/.agentkata/config.toml).
    ///
    /// Also checks environment variables:
    /// - `AGENTKATA_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `ANTHROPIC_API_KEY`
    /// - `AGENTKATA_PROVIDER`, `AGENTKATA_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load a specific file, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("AGENTKATA_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if self.anthropic_api_key.is_none() {
            self.anthropic_api_key = lookup("ANTHROPIC_API_KEY");
        }
        if let Some(provider) = lookup("AGENTKATA_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = lookup("AGENTKATA_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agentkata")
    }

    /// Where conversation fixtures live unless overridden.
    pub fn fixtures_dir(&self) -> PathBuf {
        self.fixtures_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("conversations"))
    }

    /// Model used for classification.
    pub fn classifier_model(&self) -> &str {
        self.classifier.model.as_deref().unwrap_or(&self.default_model)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.classifier.temperature < 0.0 || self.classifier.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "classifier.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.classifier.max_retries == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.max_retries must be at least 1".into(),
            ));
        }

        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.timeout_secs must be > 0".into(),
            ));
        }

        if !matches!(self.router.dispatch.as_str(), "mock" | "live") {
            return Err(ConfigError::ValidationError(format!(
                "router.dispatch must be \"mock\" or \"live\", got \"{}\"",
                self.router.dispatch
            )));
        }

        if self.retriever.k == 0 || self.retriever.k > 100 {
            return Err(ConfigError::ValidationError(
                "retriever.k must be between 1 and 100".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for KataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            anthropic_api_key: None,
            default_provider: default_provider(),
            api_url: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            classifier: ClassifierConfig::default(),
            router: RouterConfig::default(),
            retriever: RetrieverConfig::default(),
            fixtures_dir: None,
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
