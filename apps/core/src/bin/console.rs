// Interactive console chat with the trained bot

use anyhow::Context;
use chatbot_core::chatbot::Utterance;
use chatbot_core::config::AppConfig;
use chatbot_core::telemetry::init_tracing;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(config.log_format);

    let chatbot = chatbot_core::build_chatbot(&config)
        .await
        .context("failed to build chatbot")?;

    println!(
        "Hello, I am {}. How can I assist you? If you want to exit, type quit.",
        chatbot.name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("User: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }

        match chatbot.get_response(&Utterance::new(line)).await {
            Ok(statement) => println!("Bot: {}", statement),
            Err(e) => {
                error!("Chatbot failed to respond: {}", e);
                println!("Bot: {}", config.apology);
            }
        }
    }

    Ok(())
}
