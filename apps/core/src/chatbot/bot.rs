use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::adapter::LogicAdapter;
use super::best_match::BestMatchAdapter;
use super::sentiment_adapter::SentimentAdapter;
use super::statement::{SelectionParams, Statement, Utterance};
use super::storage::StatementStorage;
use super::trainer::{Corpus, CorpusTrainer};
use crate::error::AppError;
use crate::sentiment::{LexiconScorer, SentimentScorer};

/// Construction parameters for a `ChatBot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBotConfig {
    pub name: String,
    /// Upper bound on a single sentiment scorer call
    pub scorer_timeout: Duration,
    /// Reply used when no stored statement matches
    pub default_response: String,
}

impl Default for ChatBotConfig {
    fn default() -> Self {
        Self {
            name: "Bot".to_string(),
            scorer_timeout: Duration::from_millis(2000),
            default_response: "I am sorry, but I do not understand.".to_string(),
        }
    }
}

/// Response selection over a fixed list of logic adapters.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every request.
pub struct ChatBot {
    name: String,
    adapters: Vec<Arc<dyn LogicAdapter>>,
}

impl ChatBot {
    /// Creates a bot with the standard adapters: best match over `storage`,
    /// then sentiment scoring with the built-in lexicon scorer.
    pub fn new(config: &ChatBotConfig, storage: StatementStorage) -> Self {
        Self::with_scorer(config, storage, Arc::new(LexiconScorer::new()))
    }

    /// Same as [`ChatBot::new`] with a caller-supplied sentiment scorer.
    pub fn with_scorer(
        config: &ChatBotConfig,
        storage: StatementStorage,
        scorer: Arc<dyn SentimentScorer>,
    ) -> Self {
        let adapters: Vec<Arc<dyn LogicAdapter>> = vec![
            Arc::new(BestMatchAdapter::new(storage, config.default_response.clone())),
            Arc::new(SentimentAdapter::new(scorer, config.scorer_timeout)),
        ];
        Self::with_adapters(config.name.clone(), adapters)
    }

    /// Creates a bot from an explicit adapter list. Earlier adapters win confidence ties.
    pub fn with_adapters(name: impl Into<String>, adapters: Vec<Arc<dyn LogicAdapter>>) -> Self {
        Self {
            name: name.into(),
            adapters,
        }
    }

    /// Connects storage, trains it on `corpus` when empty, and builds the standard bot.
    pub async fn trained(
        config: &ChatBotConfig,
        database_url: &str,
        corpus: &Corpus,
    ) -> Result<Self, AppError> {
        let storage = StatementStorage::connect(database_url).await?;
        if storage.count().await? == 0 {
            CorpusTrainer::new(&storage).train(corpus).await?;
        } else {
            info!("Statement storage already populated, skipping training");
        }
        Ok(Self::new(config, storage))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub async fn get_response(&self, utterance: &Utterance) -> Result<Statement, AppError> {
        self.get_response_with(utterance, &SelectionParams::default())
            .await
    }

    /// Asks every willing adapter for a candidate and returns the most confident one.
    ///
    /// Any adapter failure fails the whole call.
    #[instrument(skip(self, params), fields(bot = %self.name))]
    pub async fn get_response_with(
        &self,
        utterance: &Utterance,
        params: &SelectionParams,
    ) -> Result<Statement, AppError> {
        let willing: Vec<&Arc<dyn LogicAdapter>> = self
            .adapters
            .iter()
            .filter(|adapter| adapter.can_process(utterance))
            .collect();

        let results = join_all(
            willing
                .iter()
                .map(|adapter| adapter.process(utterance, params)),
        )
        .await;

        let mut best: Option<Statement> = None;
        for (adapter, result) in willing.iter().zip(results) {
            let candidate = result?;
            debug!(
                adapter = adapter.name(),
                confidence = candidate.confidence,
                text = %candidate.text,
                "Adapter candidate"
            );
            match &best {
                Some(current) if current.confidence >= candidate.confidence => {}
                _ => best = Some(candidate),
            }
        }

        best.ok_or_else(|| {
            AppError::Internal(format!("no logic adapter of '{}' accepted the input", self.name))
        })
    }
}
