use std::sync::Arc;

use crate::chatbot::ChatBot;

/// Reply sent when the chatbot cannot produce an answer.
pub const DEFAULT_APOLOGY: &str = "Sorry, something went wrong. Please try again later.";

/// Shared, read-only state for every webhook request.
pub struct AppState {
    pub chatbot: ChatBot,
    pub apology: String,
}

impl AppState {
    pub fn new(chatbot: ChatBot, apology: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            chatbot,
            apology: apology.into(),
        })
    }
}
