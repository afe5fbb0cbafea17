//! Configuration management for Secquiz
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SecquizError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on questions per quiz accepted by the service
pub const MAX_QUESTION_COUNT: u32 = 50;

/// Main configuration structure for Secquiz
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Quiz flow settings
    #[serde(default)]
    pub quiz: QuizConfig,
    /// Chat flow settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Remote service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Quiz flow settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Number of questions requested when `--count` is not given
    #[serde(default = "default_question_count")]
    pub question_count: u32,

    /// How long the answer feedback stays up before advancing (milliseconds)
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
}

fn default_question_count() -> u32 {
    10
}

fn default_reveal_delay_ms() -> u64 {
    2000
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            reveal_delay_ms: default_reveal_delay_ms(),
        }
    }
}

impl QuizConfig {
    /// Reveal delay as a `Duration`
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

/// Chat flow settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Topic used when neither a flag nor a stored selection exists
    #[serde(default = "default_chat_topic")]
    pub default_topic: String,

    /// Pause between feedback and the next question (milliseconds)
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

fn default_chat_topic() -> String {
    "phishing_detection".to_string()
}

fn default_advance_delay_ms() -> u64 {
    2000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_topic: default_chat_topic(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

impl ChatConfig {
    /// Advance delay as a `Duration`
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and the
    /// environment and CLI layers still apply.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, used for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use secquiz::config::Config;
    ///
    /// let config = Config::load("config/config.yaml", &Default::default()).unwrap();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SecquizError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SECQUIZ_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: SECQUIZ_BASE_URL");
            self.server.base_url = base_url;
        }

        if let Some(v) = parse_env::<u64>("SECQUIZ_TIMEOUT_SECONDS") {
            self.server.timeout_seconds = v;
        }

        if let Some(v) = parse_env::<u32>("SECQUIZ_QUESTION_COUNT") {
            self.quiz.question_count = v;
        }

        if let Some(v) = parse_env::<u64>("SECQUIZ_REVEAL_DELAY_MS") {
            self.quiz.reveal_delay_ms = v;
        }

        if let Ok(topic) = std::env::var("SECQUIZ_CHAT_TOPIC") {
            tracing::debug!(topic = %topic, "Env override: SECQUIZ_CHAT_TOPIC");
            self.chat.default_topic = topic;
        }

        if let Some(v) = parse_env::<u64>("SECQUIZ_CHAT_DELAY_MS") {
            self.chat.advance_delay_ms = v;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(server) = &cli.server {
            tracing::debug!(base_url = %server, "CLI override: --server");
            self.server.base_url = server.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            return Err(SecquizError::Config("server.base_url cannot be empty".to_string()).into());
        }

        if let Err(e) = url::Url::parse(&self.server.base_url) {
            return Err(SecquizError::Config(format!(
                "server.base_url is not a valid URL ({}): {}",
                self.server.base_url, e
            ))
            .into());
        }

        if self.server.timeout_seconds == 0 {
            return Err(SecquizError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.quiz.question_count == 0 || self.quiz.question_count > MAX_QUESTION_COUNT {
            return Err(SecquizError::Config(format!(
                "quiz.question_count must be between 1 and {}",
                MAX_QUESTION_COUNT
            ))
            .into());
        }

        if self.chat.default_topic.trim().is_empty() {
            return Err(
                SecquizError::Config("chat.default_topic cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(v) => {
            tracing::debug!("Env override: {}={}", name, raw);
            Some(v)
        }
        Err(_) => {
            tracing::warn!("Invalid value for {}: {}", name, raw);
            None
        }
    }
}
