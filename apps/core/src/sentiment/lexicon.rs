//! Rule-based sentiment scoring.
//!
//! Scores text against a fixed word-valence lexicon, then adjusts for
//! intensifiers, negation, capitalization, contrastive "but" clauses and
//! exclamation marks. No model required.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use super::scorer::{PolarityScores, SentimentScorer};
use crate::error::AppError;

/// Scalar added by an intensifier ("very good").
const BOOST_INCREMENT: f32 = 0.293;
/// Scalar subtracted by a dampener ("slightly good").
const BOOST_DECREMENT: f32 = -0.293;
/// Extra valence for an ALL-CAPS sentiment word in mixed-case text.
const CAPS_INCREMENT: f32 = 0.733;
/// Multiplier applied when a negator precedes a sentiment word.
const NEGATION_SCALAR: f32 = -0.74;
/// Per-mark emphasis of '!' (capped at four marks).
const EXCLAMATION_INCREMENT: f32 = 0.292;
/// Per-mark emphasis of '?' when more than one is present (capped at three marks).
const QUESTION_INCREMENT: f32 = 0.18;
/// Normalization constant approximating the maximum expected raw score.
const NORMALIZATION_ALPHA: f32 = 15.0;

/// Word valences on a -4.0 (most negative) to +4.0 (most positive) scale.
const VALENCES: &[(&str, f32)] = &[
    // Positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("cheerful", 2.5),
    ("cool", 1.3),
    ("delighted", 2.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("fun", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("joy", 2.8),
    ("kind", 2.4),
    ("laugh", 2.6),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("perfect", 2.7),
    ("pleased", 1.9),
    ("proud", 2.1),
    ("relaxed", 2.2),
    ("smile", 1.5),
    ("super", 2.9),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("yes", 1.7),
    // Negative
    ("afraid", -2.0),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("anxious", -1.0),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broken", -1.8),
    ("cry", -2.1),
    ("depressed", -2.3),
    ("disappointed", -1.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("frustrated", -2.1),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("lonely", -1.6),
    ("lost", -1.3),
    ("mad", -2.2),
    ("miserable", -2.2),
    ("miss", -0.6),
    ("nervous", -1.1),
    ("no", -1.2),
    ("pain", -2.3),
    ("poor", -2.1),
    ("problem", -1.7),
    ("sad", -2.1),
    ("scared", -1.9),
    ("sick", -2.3),
    ("sorry", -0.3),
    ("stressed", -1.4),
    ("stupid", -2.4),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("tired", -1.9),
    ("ugly", -2.3),
    ("upset", -1.6),
    ("worried", -1.2),
    ("worry", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const INTENSIFIERS: &[&str] = &[
    "absolutely", "amazingly", "completely", "considerably", "deeply", "especially", "extremely",
    "fully", "greatly", "highly", "hugely", "incredibly", "intensely", "most", "more", "really",
    "remarkably", "so", "substantially", "totally", "tremendously", "truly", "utterly", "very",
];

const DAMPENERS: &[&str] = &[
    "almost", "barely", "hardly", "little", "marginally", "occasionally", "partly", "scarcely",
    "slightly", "somewhat",
];

const NEGATORS: &[&str] = &[
    "not", "never", "none", "nobody", "nothing", "nowhere", "neither", "nor", "cannot", "without",
    "dont", "cant", "wont", "isnt", "arent", "wasnt", "didnt", "doesnt", "couldnt", "shouldnt",
];

/// Lexicon-backed sentiment scorer.
pub struct LexiconScorer {
    valences: HashMap<&'static str, f32>,
    intensifiers: HashSet<&'static str>,
    dampeners: HashSet<&'static str>,
    negators: HashSet<&'static str>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// A token with surrounding punctuation stripped, keeping its original case.
struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl<'a> Token<'a> {
    fn is_shouting(&self) -> bool {
        self.raw.chars().filter(|c| c.is_alphabetic()).count() > 1
            && self.raw.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            dampeners: DAMPENERS.iter().copied().collect(),
            negators: NEGATORS.iter().copied().collect(),
        }
    }

    fn tokens<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        text.split_whitespace()
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
            .filter(|w| !w.is_empty())
            .map(|raw| Token {
                raw,
                lower: raw.to_lowercase(),
            })
            .collect()
    }

    fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word) || word.ends_with("n't")
    }

    /// Intensity contribution of a modifier word, in the direction of `valence`.
    fn modifier_scalar(&self, token: &Token<'_>, valence: f32, caps_differential: bool) -> f32 {
        let base = if self.intensifiers.contains(token.lower.as_str()) {
            BOOST_INCREMENT
        } else if self.dampeners.contains(token.lower.as_str()) {
            BOOST_DECREMENT
        } else {
            return 0.0;
        };

        let mut scalar = base;
        if caps_differential && token.is_shouting() {
            scalar += CAPS_INCREMENT * base.signum();
        }
        if valence < 0.0 {
            scalar = -scalar;
        }
        scalar
    }

    /// Valence of the sentiment word at `index`, after modifiers and negation.
    fn token_valence(&self, tokens: &[Token<'_>], index: usize, caps_differential: bool) -> f32 {
        let token = &tokens[index];
        let Some(&base) = self.valences.get(token.lower.as_str()) else {
            return 0.0;
        };

        let mut valence = base;
        if caps_differential && token.is_shouting() {
            valence += CAPS_INCREMENT * valence.signum();
        }

        for distance in 1..=3 {
            let Some(prev_index) = index.checked_sub(distance) else {
                break;
            };
            let prev = &tokens[prev_index];

            let damping = match distance {
                1 => 1.0,
                2 => 0.95,
                _ => 0.9,
            };
            valence += self.modifier_scalar(prev, valence, caps_differential) * damping;

            if self.is_negator(&prev.lower) {
                valence *= NEGATION_SCALAR;
            }
        }

        valence
    }

    /// Extra emphasis from '!' and repeated '?' marks.
    fn punctuation_emphasis(text: &str) -> f32 {
        let exclamations = text.matches('!').count().min(4) as f32;
        let questions = text.matches('?').count();
        let question_emphasis = if questions > 1 {
            questions.min(3) as f32 * QUESTION_INCREMENT
        } else {
            0.0
        };
        exclamations * EXCLAMATION_INCREMENT + question_emphasis
    }

    /// Scores `text` synchronously.
    pub fn score(&self, text: &str) -> PolarityScores {
        let tokens = self.tokens(text);
        if tokens.is_empty() {
            return PolarityScores {
                neu: 0.0,
                ..PolarityScores::default()
            };
        }

        let shouting = tokens.iter().filter(|t| t.is_shouting()).count();
        let caps_differential = shouting > 0 && shouting < tokens.len();

        let mut sentiments: Vec<f32> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i, caps_differential))
            .collect();

        // Contrastive clause: what follows "but" outweighs what precedes it
        if let Some(but_index) = tokens.iter().position(|t| t.lower == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < but_index {
                    *s *= 0.5;
                } else if i > but_index {
                    *s *= 1.5;
                }
            }
        }

        let raw_sum: f32 = sentiments.iter().sum();
        if raw_sum == 0.0 {
            let neutral = sentiments.iter().all(|s| *s == 0.0);
            return PolarityScores {
                neg: 0.0,
                neu: if neutral { 1.0 } else { 0.0 },
                pos: 0.0,
                compound: 0.0,
            };
        }

        let emphasis = Self::punctuation_emphasis(text);
        let total = raw_sum + emphasis * raw_sum.signum();
        let compound = (total / (total * total + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);

        let mut pos_sum = 0.0f32;
        let mut neg_sum = 0.0f32;
        let mut neu_count = 0.0f32;
        for s in &sentiments {
            if *s > 0.0 {
                pos_sum += s + 1.0;
            } else if *s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let denominator = pos_sum + neg_sum.abs() + neu_count;
        PolarityScores {
            neg: (neg_sum / denominator).abs(),
            neu: neu_count / denominator,
            pos: (pos_sum / denominator).abs(),
            compound,
        }
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    async fn polarity_scores(&self, text: &str) -> Result<PolarityScores, AppError> {
        Ok(self.score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let scorer = LexiconScorer::new();
        let scores = scorer.score("I love this, it is great");
        assert!(scores.compound > 0.5, "compound was {}", scores.compound);
        assert!(scores.pos > scores.neg);
    }

    #[test]
    fn test_negative_text() {
        let scorer = LexiconScorer::new();
        let scores = scorer.score("I am sad and angry today");
        assert!(scores.compound < -0.5, "compound was {}", scores.compound);
        assert!(scores.neg > scores.pos);
    }

    #[test]
    fn test_neutral_text_scores_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("The bus leaves at noon").compound, 0.0);
        assert_eq!(scorer.score("").compound, 0.0);
        assert_eq!(scorer.score("   ").compound, 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("I am happy").compound > 0.0);
        assert!(scorer.score("I am not happy").compound < 0.0);
        assert!(scorer.score("I don't like it").compound < 0.0);
    }

    #[test]
    fn test_intensifier_and_dampener() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("the food is good").compound;
        let boosted = scorer.score("the food is very good").compound;
        let damped = scorer.score("the food is slightly good").compound;
        assert!(boosted > plain);
        assert!(damped < plain);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let scorer = LexiconScorer::new();
        let calm = scorer.score("this is great").compound;
        let excited = scorer.score("this is great!!!").compound;
        assert!(excited > calm);
    }

    #[test]
    fn test_caps_emphasis() {
        let scorer = LexiconScorer::new();
        let lower = scorer.score("this is great").compound;
        let shouted = scorer.score("this is GREAT").compound;
        assert!(shouted > lower);
    }

    #[test]
    fn test_but_shifts_weight() {
        let scorer = LexiconScorer::new();
        let scores = scorer.score("the food was good but the service was terrible");
        assert!(scores.compound < 0.0, "compound was {}", scores.compound);
    }

    #[test]
    fn test_compound_bounded() {
        let scorer = LexiconScorer::new();
        let scores = scorer.score("LOVE LOVE love AMAZING wonderful best great awesome!!!!");
        assert!(scores.compound <= 1.0 && scores.compound > 0.9);
    }
}
