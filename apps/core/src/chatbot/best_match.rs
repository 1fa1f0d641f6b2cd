use async_trait::async_trait;
use tracing::debug;

use super::adapter::LogicAdapter;
use super::statement::{SelectionParams, Statement, Utterance};
use super::storage::{search_text, StatementStorage};
use crate::error::AppError;

/// Levenshtein distance between two strings, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity ratio in [0.0, 1.0]; 1.0 means identical.
pub fn similarity(a: &str, b: &str) -> f32 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f32 / longest as f32
}

/// Answers with the stored response to the closest known statement.
pub struct BestMatchAdapter {
    storage: StatementStorage,
    default_response: String,
}

impl BestMatchAdapter {
    pub fn new(storage: StatementStorage, default_response: impl Into<String>) -> Self {
        Self {
            storage,
            default_response: default_response.into(),
        }
    }

    fn fallback(&self, utterance: &Utterance) -> Statement {
        Statement::new(self.default_response.clone(), 0.0).in_response_to(utterance.text.clone())
    }
}

#[async_trait]
impl LogicAdapter for BestMatchAdapter {
    fn name(&self) -> &str {
        "best_match"
    }

    fn can_process(&self, _utterance: &Utterance) -> bool {
        true
    }

    async fn process(
        &self,
        utterance: &Utterance,
        params: &SelectionParams,
    ) -> Result<Statement, AppError> {
        let query = search_text(&utterance.text);
        let inputs = self.storage.known_inputs().await?;

        let closest = inputs
            .iter()
            .map(|input| (input, similarity(&query, &input.search_text)))
            .fold(None, |best: Option<(_, f32)>, candidate| match best {
                Some(b) if b.1 >= candidate.1 => Some(b),
                _ => Some(candidate),
            });

        let Some((input, confidence)) = closest else {
            return Ok(self.fallback(utterance));
        };
        debug!(matched = %input.text, confidence, "Closest known statement");

        let response = self
            .storage
            .responses_to(&input.text)
            .await?
            .into_iter()
            .find(|r| !params.exclude_text.contains(&r.text));

        Ok(match response {
            Some(record) => {
                Statement::new(record.text, confidence).in_response_to(utterance.text.clone())
            }
            None => self.fallback(utterance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("hello", "hello"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "hello"), 0.0);
        let s = similarity("how are you", "how are you doing");
        assert!(s > 0.5 && s < 1.0);
    }
}
