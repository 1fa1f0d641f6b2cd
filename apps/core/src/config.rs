//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded by a `.env`
//! file. Every field has a default, so an empty environment is valid.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

use crate::chatbot::ChatBotConfig;
use crate::error::AppError;
use crate::relay::DEFAULT_APOLOGY;
use crate::telemetry::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_SCORER_TIMEOUT_MS: u64 = 2000;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Display name of the bot
    #[validate(length(min = 1))]
    pub bot_name: String,
    /// Socket address the webhook listens on
    #[validate(length(min = 1))]
    pub bind_addr: String,
    /// SQLite URL of the statement store
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Optional JSON corpus replacing the built-in English corpus
    pub corpus_path: Option<PathBuf>,
    /// Upper bound on one sentiment scorer call, in milliseconds
    #[validate(range(min = 1, max = 60000))]
    pub scorer_timeout_ms: u64,
    /// Reply sent when the chatbot fails
    #[validate(length(min = 1))]
    pub apology: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bot_name: "Bot".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            corpus_path: None,
            scorer_timeout_ms: DEFAULT_SCORER_TIMEOUT_MS,
            apology: DEFAULT_APOLOGY.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads `.env` (if any), then reads the environment and validates the result.
    pub fn from_env() -> Result<Self, AppError> {
        // A missing .env file is fine
        let _ = dotenv::dotenv();
        Self::from_current_env()
    }

    /// Reads the current environment without touching `.env`.
    pub fn from_current_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let scorer_timeout_ms = match var("SCORER_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("SCORER_TIMEOUT_MS must be an integer: {}", e))
            })?,
            None => defaults.scorer_timeout_ms,
        };

        let config = Self {
            bot_name: var("CHATBOT_NAME").unwrap_or(defaults.bot_name),
            bind_addr: var("CHATBOT_BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            corpus_path: var("CHATBOT_CORPUS").map(PathBuf::from),
            scorer_timeout_ms,
            apology: var("CHATBOT_APOLOGY").unwrap_or(defaults.apology),
            log_format: var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn scorer_timeout(&self) -> Duration {
        Duration::from_millis(self.scorer_timeout_ms)
    }

    pub fn chatbot_config(&self) -> ChatBotConfig {
        ChatBotConfig {
            name: self.bot_name.clone(),
            scorer_timeout: self.scorer_timeout(),
            ..ChatBotConfig::default()
        }
    }
}
