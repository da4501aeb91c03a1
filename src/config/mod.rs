//! Configuration management for gavel.
//!
//! Settings are loaded from an optional TOML file and overridden by
//! `GAVEL_*` environment variables. The review-criteria table lives in
//! [`criteria`] and is compiled in; only the scoring weight overrides and
//! the review policy knobs are runtime configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod criteria;

pub use criteria::{Criterion, ScoringWeights};

/// Top-level application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gerrit: GerritConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Scoring weight overrides keyed by criterion wire key
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

/// HTTP surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Change-hosting system (Gerrit) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GerritConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for GerritConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            username: String::new(),
            password: String::new(),
        }
    }
}

/// AI reviewer connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Endpoint the review prompt is POSTed to
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            model: "gemini-1.5-flash-latest".to_string(),
            temperature: 0.3,
            max_tokens: 4000,
        }
    }
}

/// Review policy knobs consumed by the evaluation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Minimum overall score for a +1 vote when posting back
    pub min_review_score: f64,
    /// Post the rendered review back to the change host after persisting
    pub auto_post_review: bool,
    /// Maximum number of tasks the review queue holds
    pub queue_capacity: usize,
    /// Consumer poll timeout in milliseconds (bounds the shutdown latency)
    pub poll_interval_ms: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            min_review_score: 7.0,
            auto_post_review: true,
            queue_capacity: 100,
            poll_interval_ms: 1000,
        }
    }
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory persisted reviews are written to
    pub review_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            review_dir: PathBuf::from("reviews"),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply environment
    /// variable overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Settings::default(),
        };
        settings.merge_env_vars();
        Ok(settings)
    }

    /// Apply `GAVEL_*` environment variable overrides
    pub fn merge_env_vars(&mut self) {
        if let Ok(host) = std::env::var("GAVEL_GERRIT_HOST") {
            self.gerrit.host = host;
        }
        if let Ok(port) = std::env::var("GAVEL_GERRIT_PORT") {
            if let Ok(port) = port.parse() {
                self.gerrit.port = port;
            }
        }
        if let Ok(username) = std::env::var("GAVEL_GERRIT_USERNAME") {
            self.gerrit.username = username;
        }
        if let Ok(password) = std::env::var("GAVEL_GERRIT_PASSWORD") {
            self.gerrit.password = password;
        }
        if let Ok(url) = std::env::var("GAVEL_AI_API_URL") {
            self.ai.api_url = url;
        }
        if let Ok(key) = std::env::var("GAVEL_AI_API_KEY") {
            self.ai.api_key = key;
        }
        if let Ok(model) = std::env::var("GAVEL_AI_MODEL") {
            self.ai.model = model;
        }
        if let Ok(dir) = std::env::var("GAVEL_REVIEW_DIR") {
            self.storage.review_dir = PathBuf::from(dir);
        }
        if let Ok(auto) = std::env::var("GAVEL_AUTO_POST_REVIEW") {
            if let Ok(auto) = auto.parse() {
                self.review.auto_post_review = auto;
            }
        }
        if let Ok(min) = std::env::var("GAVEL_MIN_REVIEW_SCORE") {
            if let Ok(min) = min.parse() {
                self.review.min_review_score = min;
            }
        }
    }

    /// Resolve the scoring weights for this configuration
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from_overrides(self.weights.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}
