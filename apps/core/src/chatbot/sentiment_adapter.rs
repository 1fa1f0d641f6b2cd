use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use super::adapter::LogicAdapter;
use super::statement::{SelectionParams, Statement, Utterance};
use crate::error::AppError;
use crate::sentiment::SentimentScorer;

/// Reply used when the utterance leans positive.
pub const POSITIVE_RESPONSE: &str = "I'm glad you're feeling good!";

/// Reply used when the utterance is neutral or leans negative.
pub const SYMPATHETIC_RESPONSE: &str = "I'm sorry to hear that. How can I assist you further?";

/// Answers every utterance with an acknowledgment chosen by its polarity.
///
/// Confidence is `|compound|`.
pub struct SentimentAdapter {
    scorer: Arc<dyn SentimentScorer>,
    scorer_timeout: Duration,
}

impl SentimentAdapter {
    pub fn new(scorer: Arc<dyn SentimentScorer>, scorer_timeout: Duration) -> Self {
        Self {
            scorer,
            scorer_timeout,
        }
    }
}

#[async_trait]
impl LogicAdapter for SentimentAdapter {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn can_process(&self, _utterance: &Utterance) -> bool {
        true
    }

    async fn process(
        &self,
        utterance: &Utterance,
        _params: &SelectionParams,
    ) -> Result<Statement, AppError> {
        let scores = timeout(self.scorer_timeout, self.scorer.polarity_scores(&utterance.text))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "sentiment scorer exceeded {} ms",
                    self.scorer_timeout.as_millis()
                ))
            })??;

        let confidence = scores.compound.abs();
        debug!(compound = scores.compound, "Scored utterance sentiment");

        let text = if scores.is_positive() {
            POSITIVE_RESPONSE
        } else {
            SYMPATHETIC_RESPONSE
        };

        Ok(Statement::new(text, confidence).in_response_to(utterance.text.clone()))
    }
}
