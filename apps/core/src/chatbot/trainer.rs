//! Corpus training: loads dialogue corpora and stores each conversation as a
//! chain of statements, every line in response to the one before it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::storage::StatementStorage;
use crate::error::AppError;

/// Built-in English dialogue corpus.
const ENGLISH_CORPUS: &str = include_str!("../../corpus/english.json");

/// A set of example conversations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub categories: Vec<String>,
    pub conversations: Vec<Vec<String>>,
}

impl Corpus {
    /// The English corpus shipped with the crate.
    pub fn english() -> Result<Self, AppError> {
        Self::from_json(ENGLISH_CORPUS)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Total number of lines across all conversations.
    pub fn statement_count(&self) -> usize {
        self.conversations.iter().map(Vec::len).sum()
    }
}

/// Loads corpora into a `StatementStorage`.
pub struct CorpusTrainer<'a> {
    storage: &'a StatementStorage,
}

impl<'a> CorpusTrainer<'a> {
    pub fn new(storage: &'a StatementStorage) -> Self {
        Self { storage }
    }

    /// Stores every conversation line, linked to the previous line. The corpus
    /// is stored all-or-nothing.
    ///
    /// Returns the number of statements stored.
    pub async fn train(&self, corpus: &Corpus) -> Result<usize, AppError> {
        let stored = self
            .storage
            .add_conversations(&corpus.conversations)
            .await
            .inspect_err(|e| warn!("Training aborted, nothing stored: {}", e))?;

        info!(
            "Trained on {} conversations ({} statements, categories: {:?})",
            corpus.conversations.len(),
            stored,
            corpus.categories
        );
        Ok(stored)
    }
}
