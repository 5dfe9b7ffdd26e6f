//! Single agent chat: one assistant with web search, weather and calculator tools.
//!
//! Run with: cargo run --bin single-agent

use agent_team::console::{self, check_backend};
use agent_team::prelude::*;
use std::io;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv::dotenv().is_ok() {
        println!("Loaded environment variables from .env file");
    }
    console::init_logging();

    let config = AppConfig::from_env()?;

    println!("Connecting to model server at {}...", config.backend.base_url);
    let gateway = Arc::new(OpenAIGateway::with_config(config.backend.clone())?);
    println!("{}", check_backend(gateway.as_ref(), &config.model).await);

    let broker = LlmBroker::new(config.model.clone(), gateway, None);
    let mut agent = SingleAgent::new(broker, config.completion.clone());

    println!("\n=== LM Studio Agent Chat ===");
    println!("Type 'exit' or 'quit' to end the conversation.");

    let mut stdin = io::stdin().lock();
    while let Some(line) = console::read_line(&mut stdin, "\nYou: ")? {
        let input = match ConsoleInput::parse(&line) {
            ConsoleInput::Empty => continue,
            ConsoleInput::Exit => {
                println!("\nAI: Goodbye! Have a great day!");
                break;
            }
            ConsoleInput::Message(input) => input,
        };

        match agent.send(input).await {
            Ok(response) => println!("\nAI: {}", response),
            Err(e) => {
                println!("\nError: {}", e);
                println!("AI: I'm sorry, I encountered an error. Please try again.");
            }
        }
    }

    println!("\nThank you for chatting!");
    Ok(())
}
