//! # Chatbot Module
//!
//! Response selection over pluggable logic adapters, backed by a SQLite
//! statement store trained from dialogue corpora.
//!
//! ## Components
//! - `statement`: `Utterance`, `Statement` and selection parameters
//! - `adapter`: the `LogicAdapter` trait
//! - `best_match`: closest-known-statement adapter
//! - `sentiment_adapter`: polarity-driven acknowledgment adapter
//! - `storage`: SQLite statement store
//! - `trainer`: corpus loading and training
//! - `bot`: the `ChatBot` selection mechanism

pub mod adapter;
pub mod best_match;
pub mod bot;
pub mod sentiment_adapter;
pub mod statement;
pub mod storage;
pub mod trainer;

pub use adapter::LogicAdapter;
pub use best_match::BestMatchAdapter;
pub use bot::{ChatBot, ChatBotConfig};
pub use sentiment_adapter::{SentimentAdapter, POSITIVE_RESPONSE, SYMPATHETIC_RESPONSE};
pub use statement::{SelectionParams, Statement, Utterance};
pub use storage::{StatementRecord, StatementStorage};
pub use trainer::{Corpus, CorpusTrainer};
