//! # Sentiment Module
//!
//! Polarity scoring used by the sentiment response adapter.
//!
//! ## Components
//! - `scorer`: the `SentimentScorer` trait and `PolarityScores` value
//! - `lexicon`: built-in rule-based scorer

pub mod lexicon;
pub mod scorer;

pub use lexicon::LexiconScorer;
pub use scorer::{PolarityScores, SentimentScorer};
