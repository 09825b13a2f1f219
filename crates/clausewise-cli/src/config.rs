//! Application configuration
//!
//! Layered once at startup: built-in defaults, then an optional YAML file,
//! then `CLAUSEWISE__*` environment variables (`__` separates nested keys,
//! e.g. `CLAUSEWISE__LLM__MODEL`), then command-line flags.

use anyhow::Context;
use clausewise_classifiers::{DetectionConfig, RiskKeywordTable};
use clausewise_core::{GeminiConfig, RateLimiter, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "clausewise.yaml";

const ENV_PREFIX: &str = "CLAUSEWISE";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory for saved analyses
    pub output_dir: PathBuf,

    /// Cap on clauses analyzed per document; `0` or `null` analyzes all
    pub max_clauses: Option<usize>,

    /// Model backend settings
    pub llm: LlmSettings,

    /// Clause pattern registry and context window
    pub detection: DetectionConfig,

    /// Risk keyword tiers
    pub risk: RiskKeywordTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            max_clauses: Some(50),
            llm: LlmSettings::default(),
            detection: DetectionConfig::default(),
            risk: RiskKeywordTable::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (required) or the default file (optional), then the
    /// environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (file, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {:?}", file))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Load from a YAML string only
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Apply command-line flags over loaded values
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(max_clauses) = overrides.max_clauses {
            self.max_clauses = Some(max_clauses);
        }
        if let Some(model) = overrides.model {
            self.llm.model = model;
        }
        self
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub max_clauses: Option<usize>,
    pub model: Option<String>,
}

/// Model backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Gemini model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum time between model calls
    #[serde(default = "default_min_call_interval_ms")]
    pub min_call_interval_ms: u64,

    /// Wait after a rate-limit error
    #[serde(default = "default_rate_limit_backoff_secs")]
    pub rate_limit_backoff_secs: u64,

    /// Calls per clause, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            min_call_interval_ms: default_min_call_interval_ms(),
            rate_limit_backoff_secs: default_rate_limit_backoff_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl LlmSettings {
    /// Client settings for `api_key`
    pub fn gemini_config(&self, api_key: impl Into<String>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.into(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(Duration::from_millis(self.min_call_interval_ms))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_secs(self.rate_limit_backoff_secs),
        )
    }
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_min_call_interval_ms() -> u64 {
    1000
}

fn default_rate_limit_backoff_secs() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    5
}
