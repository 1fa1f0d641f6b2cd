//! Chatbot Module Tests
//!
//! Sentiment adapter contract, statement storage, corpus training, best-match
//! lookup and cross-adapter response selection.

use crate::chatbot::{
    BestMatchAdapter, ChatBot, ChatBotConfig, Corpus, CorpusTrainer, LogicAdapter,
    SelectionParams, SentimentAdapter, Statement, StatementStorage, Utterance,
    POSITIVE_RESPONSE, SYMPATHETIC_RESPONSE,
};
use crate::error::AppError;
use crate::sentiment::{PolarityScores, SentimentScorer};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

// --- Mock Components ---

/// Scores every text with the same compound value.
struct FixedScorer(f32);

#[async_trait]
impl SentimentScorer for FixedScorer {
    async fn polarity_scores(&self, _text: &str) -> Result<PolarityScores, AppError> {
        Ok(PolarityScores {
            compound: self.0,
            ..PolarityScores::default()
        })
    }
}

struct FailingScorer;

#[async_trait]
impl SentimentScorer for FailingScorer {
    async fn polarity_scores(&self, _text: &str) -> Result<PolarityScores, AppError> {
        Err(AppError::ScorerUnavailable("lexicon not loaded".to_string()))
    }
}

struct SlowScorer {
    delay: Duration,
}

#[async_trait]
impl SentimentScorer for SlowScorer {
    async fn polarity_scores(&self, _text: &str) -> Result<PolarityScores, AppError> {
        sleep(self.delay).await;
        Ok(PolarityScores::default())
    }
}

/// Always proposes the same statement and counts how often it was asked.
struct FixedAdapter {
    name: &'static str,
    text: &'static str,
    confidence: f32,
    accepts: bool,
    calls: Arc<AtomicUsize>,
}

impl FixedAdapter {
    fn new(name: &'static str, text: &'static str, confidence: f32) -> Self {
        Self {
            name,
            text,
            confidence,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl LogicAdapter for FixedAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn can_process(&self, _utterance: &Utterance) -> bool {
        self.accepts
    }

    async fn process(
        &self,
        _utterance: &Utterance,
        _params: &SelectionParams,
    ) -> Result<Statement, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Statement::new(self.text, self.confidence))
    }
}

fn sentiment_adapter(scorer: impl SentimentScorer) -> SentimentAdapter {
    SentimentAdapter::new(Arc::new(scorer), Duration::from_millis(500))
}

async fn memory_storage() -> StatementStorage {
    StatementStorage::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory storage")
}

async fn trained_storage() -> StatementStorage {
    let storage = memory_storage().await;
    let corpus = Corpus::english().expect("Built-in corpus should parse");
    CorpusTrainer::new(&storage)
        .train(&corpus)
        .await
        .expect("Training failed");
    storage
}

#[cfg(test)]
mod sentiment_adapter_tests {
    use super::*;

    #[tokio::test]
    async fn test_positive_compound_gives_positive_statement() {
        for compound in [0.01f32, 0.4, 0.93, 1.0] {
            let adapter = sentiment_adapter(FixedScorer(compound));
            let statement = adapter
                .process(&Utterance::new("whatever"), &SelectionParams::default())
                .await
                .expect("process failed");

            assert_eq!(statement.text, POSITIVE_RESPONSE);
            assert!((statement.confidence - compound.abs()).abs() < f32::EPSILON);
        }
    }

    #[tokio::test]
    async fn test_non_positive_compound_gives_sympathetic_statement() {
        for compound in [0.0f32, -0.02, -0.6, -1.0] {
            let adapter = sentiment_adapter(FixedScorer(compound));
            let statement = adapter
                .process(&Utterance::new("whatever"), &SelectionParams::default())
                .await
                .expect("process failed");

            assert_eq!(statement.text, SYMPATHETIC_RESPONSE);
            assert!((statement.confidence - compound.abs()).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_can_process_everything() {
        let adapter = sentiment_adapter(FixedScorer(0.0));
        assert!(adapter.can_process(&Utterance::new("")));
        assert!(adapter.can_process(&Utterance::new("anything at all")));
        assert!(adapter.can_process(&Utterance::from_sender("hi", "+15550001111")));
    }

    #[tokio::test]
    async fn test_lexicon_scorer_end_to_end() {
        let adapter = sentiment_adapter(crate::sentiment::LexiconScorer::new());
        let params = SelectionParams::default();

        let happy = adapter
            .process(&Utterance::new("I love this, it is great"), &params)
            .await
            .unwrap();
        assert_eq!(happy.text, POSITIVE_RESPONSE);
        assert!(happy.confidence > 0.5);

        let neutral = adapter
            .process(&Utterance::new("The bus leaves at noon"), &params)
            .await
            .unwrap();
        assert_eq!(neutral.text, SYMPATHETIC_RESPONSE);
        assert_eq!(neutral.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_scorer_failure_propagates() {
        let adapter = sentiment_adapter(FailingScorer);
        let result = adapter
            .process(&Utterance::new("hello"), &SelectionParams::default())
            .await;
        assert!(matches!(result, Err(AppError::ScorerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_slow_scorer_times_out() {
        let adapter = SentimentAdapter::new(
            Arc::new(SlowScorer {
                delay: Duration::from_millis(500),
            }),
            Duration::from_millis(20),
        );
        let result = adapter
            .process(&Utterance::new("hello"), &SelectionParams::default())
            .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_count() {
        let storage = memory_storage().await;
        assert_eq!(storage.count().await.unwrap(), 0);

        let first = storage.add("Hello!", None).await.unwrap();
        assert_eq!(first.search_text, "hello");
        assert_eq!(first.in_response_to, None);

        storage.add("Hi", Some("Hello!")).await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_responses_and_known_inputs() {
        let storage = memory_storage().await;
        storage.add("Hello", None).await.unwrap();
        storage.add("Hi", Some("Hello")).await.unwrap();
        storage.add("Greetings", Some("Hello")).await.unwrap();

        let responses = storage.responses_to("Hello").await.unwrap();
        let texts: Vec<&str> = responses.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hi", "Greetings"]);

        let inputs = storage.known_inputs().await.unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].text, "Hello");
    }

    #[tokio::test]
    async fn test_file_backed_storage_persists() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("bot.sqlite").display());

        {
            let storage = StatementStorage::connect(&url).await.unwrap();
            storage.add("Hello", None).await.unwrap();
        }

        let reopened = StatementStorage::connect(&url).await.unwrap();
        let all = reopened.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "Hello");
    }
}

#[cfg(test)]
mod trainer_tests {
    use super::*;

    #[tokio::test]
    async fn test_train_links_conversation_lines() {
        let storage = memory_storage().await;
        let corpus = Corpus::from_json(
            r#"{"conversations": [["How are you?", "Fine.", "Good to hear."]]}"#,
        )
        .unwrap();

        let stored = CorpusTrainer::new(&storage).train(&corpus).await.unwrap();
        assert_eq!(stored, 3);

        let all = storage.all().await.unwrap();
        assert_eq!(all[0].in_response_to, None);
        assert_eq!(all[1].in_response_to.as_deref(), Some("How are you?"));
        assert_eq!(all[2].in_response_to.as_deref(), Some("Fine."));
    }

    #[tokio::test]
    async fn test_failed_training_stores_nothing() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let storage = StatementStorage::from_pool(pool.clone()).await.unwrap();
        sqlx::query(
            r#"
            CREATE TRIGGER reject_line BEFORE INSERT ON statements
            WHEN NEW.text = 'Unstorable line'
            BEGIN
                SELECT RAISE(ABORT, 'line rejected');
            END;
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let corpus = Corpus::from_json(
            r#"{"conversations": [["Hello", "Hi"], ["Good morning", "Unstorable line"]]}"#,
        )
        .unwrap();

        let result = CorpusTrainer::new(&storage).train(&corpus).await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(storage.count().await.unwrap(), 0);

        // A later run can still train from scratch
        sqlx::query("DROP TRIGGER reject_line")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(CorpusTrainer::new(&storage).train(&corpus).await.unwrap(), 4);
        assert_eq!(storage.count().await.unwrap(), 4);
    }

    #[test]
    fn test_builtin_corpus_loads() {
        let corpus = Corpus::english().unwrap();
        assert!(!corpus.conversations.is_empty());
        assert!(corpus.categories.contains(&"greetings".to_string()));
        assert!(corpus.statement_count() > corpus.conversations.len());
    }

    #[test]
    fn test_malformed_corpus_rejected() {
        assert!(matches!(
            Corpus::from_json("{not json"),
            Err(AppError::Validation(_))
        ));
    }
}

#[cfg(test)]
mod best_match_tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_match() {
        let adapter = BestMatchAdapter::new(trained_storage().await, "default");
        let statement = adapter
            .process(&Utterance::new("hello!"), &SelectionParams::default())
            .await
            .unwrap();

        assert_eq!(statement.text, "Hi");
        assert_eq!(statement.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_excluded_response_skipped() {
        let adapter = BestMatchAdapter::new(trained_storage().await, "default");
        let params = SelectionParams {
            exclude_text: vec!["Hi".to_string()],
        };
        let statement = adapter
            .process(&Utterance::new("Hello"), &params)
            .await
            .unwrap();

        assert_eq!(statement.text, "Greetings!");
    }

    #[tokio::test]
    async fn test_empty_storage_returns_default() {
        let adapter = BestMatchAdapter::new(memory_storage().await, "I do not understand.");
        let statement = adapter
            .process(&Utterance::new("anything"), &SelectionParams::default())
            .await
            .unwrap();

        assert_eq!(statement.text, "I do not understand.");
        assert_eq!(statement.confidence, 0.0);
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_highest_confidence_wins() {
        let adapters: Vec<Arc<dyn LogicAdapter>> = vec![
            Arc::new(FixedAdapter::new("low", "low", 0.2)),
            Arc::new(FixedAdapter::new("high", "high", 0.9)),
            Arc::new(FixedAdapter::new("mid", "mid", 0.5)),
        ];
        let bot = ChatBot::with_adapters("Bot", adapters);
        let statement = bot.get_response(&Utterance::new("hi")).await.unwrap();
        assert_eq!(statement.text, "high");
    }

    #[tokio::test]
    async fn test_ties_go_to_first_adapter() {
        let adapters: Vec<Arc<dyn LogicAdapter>> = vec![
            Arc::new(FixedAdapter::new("first", "first", 0.5)),
            Arc::new(FixedAdapter::new("second", "second", 0.5)),
        ];
        let bot = ChatBot::with_adapters("Bot", adapters);
        let statement = bot.get_response(&Utterance::new("hi")).await.unwrap();
        assert_eq!(statement.text, "first");
    }

    #[tokio::test]
    async fn test_unwilling_adapter_not_consulted() {
        let mut refusing = FixedAdapter::new("refusing", "never", 1.0);
        refusing.accepts = false;
        let calls = refusing.calls.clone();

        let adapters: Vec<Arc<dyn LogicAdapter>> = vec![
            Arc::new(refusing),
            Arc::new(FixedAdapter::new("willing", "sure", 0.1)),
        ];
        let bot = ChatBot::with_adapters("Bot", adapters);
        let statement = bot.get_response(&Utterance::new("hi")).await.unwrap();

        assert_eq!(statement.text, "sure");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_willing_adapter_is_an_error() {
        let bot = ChatBot::with_adapters("Bot", vec![]);
        let result = bot.get_response(&Utterance::new("hi")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_adapter_failure_fails_selection() {
        let adapters: Vec<Arc<dyn LogicAdapter>> = vec![
            Arc::new(FixedAdapter::new("fine", "fine", 0.9)),
            Arc::new(sentiment_adapter(FailingScorer)),
        ];
        let bot = ChatBot::with_adapters("Bot", adapters);
        let result = bot.get_response(&Utterance::new("hi")).await;
        assert!(matches!(result, Err(AppError::ScorerUnavailable(_))));
    }

    #[tokio::test]
    async fn test_standard_bot_prefers_specific_match() {
        let bot = ChatBot::new(&ChatBotConfig::default(), trained_storage().await);
        assert_eq!(bot.adapter_names(), vec!["best_match", "sentiment"]);

        let greeting = bot.get_response(&Utterance::new("Hello")).await.unwrap();
        assert_eq!(greeting.text, "Hi");
    }

    #[tokio::test]
    async fn test_standard_bot_prefers_strong_sentiment() {
        let bot = ChatBot::new(&ChatBotConfig::default(), trained_storage().await);

        let happy = bot
            .get_response(&Utterance::new("I love this, it is great"))
            .await
            .unwrap();
        assert_eq!(happy.text, POSITIVE_RESPONSE);

        let sad = bot
            .get_response(&Utterance::new("I am sad and angry today"))
            .await
            .unwrap();
        assert_eq!(sad.text, SYMPATHETIC_RESPONSE);
    }

    #[tokio::test]
    async fn test_empty_utterance_still_answered() {
        let bot = ChatBot::new(&ChatBotConfig::default(), trained_storage().await);
        let statement = bot.get_response(&Utterance::new("")).await.unwrap();
        assert!(!statement.text.is_empty());
    }

    #[tokio::test]
    async fn test_trained_skips_populated_storage() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("bot.sqlite").display());
        let corpus = Corpus::english().unwrap();
        let config = ChatBotConfig::default();

        ChatBot::trained(&config, &url, &corpus).await.unwrap();
        ChatBot::trained(&config, &url, &corpus).await.unwrap();

        let storage = StatementStorage::connect(&url).await.unwrap();
        assert_eq!(storage.count().await.unwrap() as usize, corpus.statement_count());
    }
}
