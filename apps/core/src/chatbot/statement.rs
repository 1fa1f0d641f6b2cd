use serde::{Deserialize, Serialize};

/// One user-submitted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Message text (may be empty)
    pub text: String,
    /// Opaque sender identifier, e.g. the originating phone number
    pub sender: Option<String>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: None,
        }
    }

    pub fn from_sender(text: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Some(sender.into()),
        }
    }
}

/// A candidate reply produced by a logic adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Text of the statement this one answers, when known
    pub in_response_to: Option<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            in_response_to: None,
        }
    }

    pub fn in_response_to(mut self, text: impl Into<String>) -> Self {
        self.in_response_to = Some(text.into());
        self
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Extra response-selection parameters handed to every adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// Responses that must not be returned for this request
    pub exclude_text: Vec<String>,
}
