use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Polarity breakdown of one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Share of negative sentiment (0.0 - 1.0)
    pub neg: f32,
    /// Share of neutral tokens (0.0 - 1.0)
    pub neu: f32,
    /// Share of positive sentiment (0.0 - 1.0)
    pub pos: f32,
    /// Normalized net polarity (-1.0 - 1.0)
    pub compound: f32,
}

impl PolarityScores {
    /// Whether the text leans net positive. Exactly zero counts as not positive.
    pub fn is_positive(&self) -> bool {
        self.compound > 0.0
    }
}

/// Defines the public interface for a sentiment scorer.
///
/// This trait abstracts the scoring backend so the built-in lexicon scorer can be
/// swapped for a remote or model-backed one.
#[async_trait]
pub trait SentimentScorer: Send + Sync + 'static {
    /// Computes polarity scores for `text`. Implementations report backend
    /// failures as `AppError::ScorerUnavailable`.
    async fn polarity_scores(&self, text: &str) -> Result<PolarityScores, AppError>;
}
