//! Sequence encoding: word-level vocabulary building, text-to-id mapping and
//! padding to rectangular batches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Id used for padding. Never assigned to a token.
pub const PAD_ID: u32 = 0;

/// Token reported for the reserved out-of-vocabulary id.
pub const OOV_TOKEN: &str = "<OOV>";

/// Characters stripped from text before it is split into words.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// What happens to tokens that did not make it into the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OovPolicy {
    /// Unknown tokens are skipped.
    #[default]
    Drop,
    /// Unknown tokens map to id 1; known tokens are numbered from 2.
    Reserve,
}

/// Immutable token to id mapping, built once from a training corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    word_index: HashMap<String, u32>,
    index_word: HashMap<u32, String>,
    oov_policy: OovPolicy,
}

/// Lowercase, drop filter characters and split on whitespace.
pub fn text_to_word_sequence(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if FILTERS.contains(c) { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

impl Vocabulary {
    /// Build a vocabulary holding at most `max_vocab` of the most frequent
    /// tokens. Ties keep first-seen order.
    pub fn fit<S: AsRef<str>>(texts: &[S], max_vocab: usize, oov_policy: OovPolicy) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();

        for text in texts {
            for word in text_to_word_sequence(text.as_ref()) {
                match position.get(&word) {
                    Some(&idx) => counts[idx].1 += 1,
                    None => {
                        position.insert(word.clone(), counts.len());
                        counts.push((word, 1));
                    }
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let first_id = match oov_policy {
            OovPolicy::Drop => 1,
            OovPolicy::Reserve => 2,
        };

        let mut word_index = HashMap::new();
        let mut index_word = HashMap::new();
        for (offset, (word, _)) in counts.into_iter().take(max_vocab).enumerate() {
            let id = first_id + offset as u32;
            index_word.insert(id, word.clone());
            word_index.insert(word, id);
        }

        Self {
            word_index,
            index_word,
            oov_policy,
        }
    }

    /// Number of real tokens (padding and OOV ids excluded).
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    pub fn oov_policy(&self) -> OovPolicy {
        self.oov_policy
    }

    /// Id reserved for unknown tokens, if the policy reserves one.
    pub fn oov_id(&self) -> Option<u32> {
        match self.oov_policy {
            OovPolicy::Drop => None,
            OovPolicy::Reserve => Some(1),
        }
    }

    pub fn id_of(&self, token: &str) -> Option<u32> {
        self.word_index.get(token).copied()
    }

    pub fn token_of(&self, id: u32) -> Option<&str> {
        if Some(id) == self.oov_id() {
            return Some(OOV_TOKEN);
        }
        self.index_word.get(&id).map(String::as_str)
    }

    /// Map one text to ids using this vocabulary.
    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        text_to_word_sequence(text)
            .iter()
            .filter_map(|word| self.id_of(word).or(self.oov_id()))
            .collect()
    }

    pub fn texts_to_sequences<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|text| self.text_to_sequence(text.as_ref()))
            .collect()
    }

    /// Map id sequences back to space-joined text. Padding and unassigned ids are skipped.
    pub fn sequences_to_texts(&self, sequences: &[Vec<u32>]) -> Vec<String> {
        sequences
            .iter()
            .map(|seq| {
                seq.iter()
                    .filter(|&&id| id != PAD_ID)
                    .filter_map(|&id| self.token_of(id))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

/// Build a vocabulary from `texts` and encode them with it.
///
/// Tokens outside the `max_vocab` cap are dropped.
pub fn tokenize<S: AsRef<str>>(texts: &[S], max_vocab: usize) -> (Vec<Vec<u32>>, Vocabulary) {
    tokenize_with(texts, max_vocab, OovPolicy::Drop)
}

pub fn tokenize_with<S: AsRef<str>>(
    texts: &[S],
    max_vocab: usize,
    oov_policy: OovPolicy,
) -> (Vec<Vec<u32>>, Vocabulary) {
    let vocabulary = Vocabulary::fit(texts, max_vocab, oov_policy);
    let sequences = vocabulary.texts_to_sequences(texts);
    (sequences, vocabulary)
}

/// Which end of a sequence receives padding or loses elements on truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Pre,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadOptions {
    pub padding: Side,
    pub truncating: Side,
    pub value: u32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            padding: Side::Pre,
            truncating: Side::Pre,
            value: PAD_ID,
        }
    }
}

/// Left-pad with zeros or left-truncate every sequence to `target_length`.
pub fn pad(sequences: &[Vec<u32>], target_length: usize) -> Vec<Vec<u32>> {
    pad_with(sequences, Some(target_length), PadOptions::default())
}

/// Pad or truncate every sequence to `maxlen`, or to the longest sequence when `maxlen` is `None`.
pub fn pad_with(sequences: &[Vec<u32>], maxlen: Option<usize>, options: PadOptions) -> Vec<Vec<u32>> {
    let target = maxlen.unwrap_or_else(|| sequences.iter().map(Vec::len).max().unwrap_or(0));

    sequences
        .iter()
        .map(|seq| {
            let kept: &[u32] = if seq.len() > target {
                match options.truncating {
                    Side::Pre => &seq[seq.len() - target..],
                    Side::Post => &seq[..target],
                }
            } else {
                seq
            };

            let fill = std::iter::repeat(options.value).take(target - kept.len());
            match options.padding {
                Side::Pre => fill.chain(kept.iter().copied()).collect(),
                Side::Post => kept.iter().copied().chain(fill).collect(),
            }
        })
        .collect()
}
