//! Text normalization: lowercasing, punctuation stripping, stopword removal
//! and lemmatization.
//!
//! Every transform is a pure `&str -> String` function. They can be applied in
//! any order, but [`normalize`] runs them in the documented pipeline order.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Standard English stopword list (179 entries).
const STOPWORDS_EN: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Inflected forms whose base form cannot be derived by suffix rules.
const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("goes", "go"),
    ("does", "do"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("pies", "pie"),
    ("ties", "tie"),
    ("lies", "lie"),
    ("buses", "bus"),
    ("gases", "gas"),
    ("showing", "show"),
    ("shown", "show"),
    ("showed", "show"),
    ("going", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("running", "run"),
    ("ran", "run"),
    ("making", "make"),
    ("made", "make"),
    ("taking", "take"),
    ("took", "take"),
    ("taken", "take"),
    ("having", "have"),
    ("had", "have"),
    ("saying", "say"),
    ("said", "say"),
    ("getting", "get"),
    ("got", "get"),
    ("feeling", "feel"),
    ("felt", "feel"),
    ("thinking", "think"),
    ("thought", "think"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
];

/// Words that end like plurals but are already base forms.
const INVARIANT_WORDS: &[&str] = &[
    "always", "perhaps", "whereas", "sometimes", "besides", "afterwards", "towards",
    "upwards", "backwards", "nowadays", "news", "series", "species", "means", "lens",
    "chaos", "bias", "canvas", "atlas", "alias", "its", "hers", "ours", "yours", "theirs",
    "diabetes", "measles", "scissors", "trousers", "pants", "shorts",
];

/// Tokens ending in these suffixes are left alone by the plural `s` rule.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "ous", "ics"];

/// Ordered plural suffix rewrites; the first match wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS_EN.iter().copied().collect());

static INVARIANTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| INVARIANT_WORDS.iter().copied().collect());

static LEMMAS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LEMMA_EXCEPTIONS.iter().copied().collect());

// NOTE: expect() is acceptable here; the pattern is a compile-time constant.
static WORD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:'\w+)*|[^\w\s]").expect("Invalid regex: word token pattern")
});

/// Lowercase the whole text.
pub fn lowercase_text(text: &str) -> String {
    text.to_lowercase()
}

/// Strip every ASCII punctuation character, leaving whitespace untouched.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Split text into word tokens; punctuation marks become tokens of their own.
pub fn word_tokenize(text: &str) -> Vec<&str> {
    WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Whether `word` belongs to the English stopword set (case-sensitive).
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Drop stopword tokens and re-join the rest with single spaces.
///
/// Matching is case-sensitive, so callers normally lowercase first.
pub fn remove_stopwords(text: &str) -> String {
    word_tokenize(text)
        .into_iter()
        .filter(|word| !is_stopword(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Base form of a single token.
///
/// Irregular forms come from a fixed table and known base forms ending in `s`
/// are kept as-is; only then are plural suffix rules tried.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = LEMMAS.get(word) {
        return (*base).to_string();
    }
    if INVARIANTS.contains(word) {
        return word.to_string();
    }

    let char_count = word.chars().count();
    if char_count <= 3 || !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }

    for (suffix, replacement) in PLURAL_RULES {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().count() >= 2 {
                return format!("{}{}", stem, replacement);
            }
        }
    }

    if SINGULAR_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Replace each token with its base form and re-join with single spaces.
pub fn lemmatize_text(text: &str) -> String {
    word_tokenize(text)
        .into_iter()
        .map(lemmatize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full pipeline: lowercase, strip punctuation, remove stopwords, lemmatize.
pub fn normalize(text: &str) -> String {
    let text = lowercase_text(text);
    let text = remove_punctuation(&text);
    let text = remove_stopwords(&text);
    lemmatize_text(&text)
}
