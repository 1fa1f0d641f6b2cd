//! # Relay Module
//!
//! HTTP webhook that relays inbound SMS text to the chatbot and wraps the
//! reply in the gateway's XML envelope.
//!
//! ## Endpoints
//!
//! - `POST /sms`: form-encoded inbound message, XML reply
//! - `GET /health`: health check

pub mod messaging;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub use messaging::MessagingResponse;
pub use state::{AppState, DEFAULT_APOLOGY};

/// Build the Axum router with the shared [`AppState`].
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sms", post(routes::sms_reply))
        .route("/health", get(routes::health))
        .with_state(state)
}
