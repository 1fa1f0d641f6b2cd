//! # chatbot-core
//!
//! An SMS chatbot that picks its reply from competing logic adapters, one of
//! them driven by sentiment, plus standalone text-preprocessing tools and a
//! sequence-to-sequence topology declaration for learned dialogue.
//!
//! ## Modules
//! - `chatbot`: response selection, adapters, statement storage, training
//! - `sentiment`: polarity scoring
//! - `relay`: `POST /sms` webhook and reply envelope
//! - `preprocessing`: normalization, sequence encoding, dataset splitting
//! - `seq2seq`: encoder/decoder topology
//! - `config`, `telemetry`, `error`: ambient plumbing

pub mod chatbot;
pub mod config;
pub mod error;
pub mod preprocessing;
pub mod relay;
pub mod sentiment;
pub mod seq2seq;
pub mod telemetry;

pub use error::AppError;

use chatbot::{ChatBot, Corpus};
use config::AppConfig;

/// Loads the configured corpus, or the built-in English one.
pub fn load_corpus(config: &AppConfig) -> Result<Corpus, AppError> {
    match &config.corpus_path {
        Some(path) => Corpus::from_file(path),
        None => Corpus::english(),
    }
}

/// Builds the trained chatbot described by `config`.
pub async fn build_chatbot(config: &AppConfig) -> Result<ChatBot, AppError> {
    let corpus = load_corpus(config)?;
    ChatBot::trained(&config.chatbot_config(), &config.database_url, &corpus).await
}

#[cfg(test)]
mod tests;
