//! # Preprocessing Module
//!
//! Standalone data-preparation tools for dialogue training data.
//! None of these are wired into the chatbot at runtime.
//!
//! ## Components
//! - `normalizer`: lowercase, punctuation, stopword and lemma transforms
//! - `sequence`: vocabulary building, id encoding and padding
//! - `split`: seeded train/validation partitioning

pub mod normalizer;
pub mod sequence;
pub mod split;

pub use normalizer::{
    is_stopword, lemmatize, lemmatize_text, lowercase_text, normalize, remove_punctuation,
    remove_stopwords, word_tokenize,
};
pub use sequence::{
    pad, pad_with, tokenize, tokenize_with, OovPolicy, PadOptions, Side, Vocabulary, PAD_ID,
};
pub use split::{split, split_data, DatasetSplit};
