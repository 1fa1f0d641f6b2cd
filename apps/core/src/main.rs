// SMS chatbot webhook server

use anyhow::Context;
use chatbot_core::config::AppConfig;
use chatbot_core::relay::{build_app, AppState};
use chatbot_core::telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(config.log_format);

    let chatbot = chatbot_core::build_chatbot(&config)
        .await
        .context("failed to build chatbot")?;
    info!(
        "Chatbot '{}' ready with adapters {:?}",
        chatbot.name(),
        chatbot.adapter_names()
    );

    let app = build_app(AppState::new(chatbot, config.apology.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    info!("Webhook listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
