//! Axum route handlers for the SMS webhook.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::messaging::{MessagingResponse, CONTENT_TYPE_XML};
use super::state::AppState;
use crate::chatbot::Utterance;

/// Form fields the gateway posts for an inbound message. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /health`: health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /sms`: reply to an inbound message.
///
/// Always answers 200 with a reply envelope. A missing or unparseable `Body`
/// is treated as empty text; chatbot failures become the apology message.
pub async fn sms_reply(
    State(state): State<Arc<AppState>>,
    form: Result<Form<InboundSms>, FormRejection>,
) -> Response {
    let inbound = match form {
        Ok(Form(inbound)) => inbound,
        Err(rejection) => {
            warn!("Unreadable webhook payload, treating as empty message: {}", rejection);
            InboundSms::default()
        }
    };

    let reply = relay(&state, inbound).await;
    let envelope = MessagingResponse::new().message(reply).to_xml();

    ([(header::CONTENT_TYPE, CONTENT_TYPE_XML)], envelope).into_response()
}

#[instrument(skip(state, inbound), fields(request_id = %Uuid::new_v4(), sender = ?inbound.from))]
async fn relay(state: &AppState, inbound: InboundSms) -> String {
    let text = inbound.body.unwrap_or_default();
    info!("Received user message: {:?}", text);

    let utterance = Utterance {
        text,
        sender: inbound.from,
    };

    match state.chatbot.get_response(&utterance).await {
        Ok(statement) => {
            info!(
                confidence = statement.confidence,
                "Chatbot response: {}", statement.text
            );
            statement.text
        }
        Err(e) => {
            error!("Chatbot failed to respond: {}", e);
            state.apology.clone()
        }
    }
}
