use async_trait::async_trait;

use super::statement::{SelectionParams, Statement, Utterance};
use crate::error::AppError;

/// Defines the public interface for a logic adapter.
///
/// Each adapter proposes at most one candidate `Statement` per utterance; the
/// owning `ChatBot` picks the most confident candidate across all adapters.
#[async_trait]
pub trait LogicAdapter: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this adapter wants to answer `utterance` at all.
    fn can_process(&self, utterance: &Utterance) -> bool;

    /// Produces a candidate reply with its confidence.
    async fn process(
        &self,
        utterance: &Utterance,
        params: &SelectionParams,
    ) -> Result<Statement, AppError>;
}
