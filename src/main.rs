//! Team chat: a router hands every message to one of four specialist agents.
//!
//! Run with: cargo run --bin agent-team

use agent_team::console::{self, check_backend};
use agent_team::prelude::*;
use std::io;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv::dotenv().is_ok() {
        println!("Loaded environment variables from .env file");
    }
    console::init_logging();

    let config = AppConfig::from_env()?;
    println!("\n{}\n", config.tracing);

    println!("Connecting to model server at {}...", config.backend.base_url);
    let gateway = OpenAIGateway::with_config(config.backend.clone())?;
    println!("{}", check_backend(&gateway, &config.model).await);

    let mut session = TeamSession::from_config(&config)?;

    println!("\n=== Agent Team Chat ===");
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

        match session.send(input).await {
            Ok(reply) => {
                println!("\nAI: {}", reply.response);
                println!("[Handled by {}]", reply.agent.display_name());
            }
            Err(e) => {
                println!("\nError: {}", e);
                println!("AI: I'm sorry, I encountered an error. Please try again.");
            }
        }
    }

    println!("\nThank you for chatting!");
    Ok(())
}
