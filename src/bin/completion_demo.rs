//! Completion demo: the different ways of calling the chat model directly.
//!
//! Shows a plain prompt, role-tagged messages, a system-prompted translation,
//! token streaming and a small concurrent batch. Every step runs under its own
//! correlation id and, with tracing enabled, is published as its own trace.
//!
//! Run with: cargo run --bin completion-demo

use agent_team::console;
use agent_team::prelude::*;
use futures::future::join_all;
use futures::stream::StreamExt;
use std::io::{self, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv::dotenv().is_ok() {
        println!("Loaded environment variables from .env file");
    }
    console::init_logging();

    let config = AppConfig::from_env()?;
    println!("\n{}", config.tracing);

    let runs = TracedRuns::from_config(&config.tracing)?;
    let gateway = Arc::new(OpenAIGateway::with_config(config.backend.clone())?);
    let broker = LlmBroker::new(config.model.clone(), gateway, Some(runs.tracer().clone()))
        .with_source("completion_demo");
    let completion = Some(config.completion.clone());

    if let Err(e) = run(&runs, &broker, completion).await {
        println!("\nError occurred: {}", e);
        println!("Make sure:");
        println!("1. LM Studio is running");
        println!("2. Server is started in LM Studio");
        println!("3. Port 1234 is correct");
    }

    println!("\n=== TRACE SUMMARY ===");
    for summary in runs.tracer().get_last_n_summaries(6, None) {
        println!("{}", summary);
    }

    Ok(())
}

/// One traced, non-streaming model call
async fn invoke(
    runs: &TracedRuns,
    broker: &LlmBroker,
    name: &str,
    messages: Vec<LlmMessage>,
    config: Option<CompletionConfig>,
) -> agent_team::Result<String> {
    let input = messages.last().and_then(|m| m.content.clone()).unwrap_or_default();
    runs.run(name, &input, |correlation_id| async move {
        broker.generate(&messages, None, config, Some(correlation_id)).await
    })
    .await
}

async fn run(
    runs: &TracedRuns,
    broker: &LlmBroker,
    config: Option<CompletionConfig>,
) -> anyhow::Result<()> {
    println!("\n=== DIFFERENT WAYS TO INVOKE CHAT MODELS ===");

    println!("\n1. Using a simple string:");
    let messages = vec![LlmMessage::user("Say hello in English")];
    let response = invoke(runs, broker, "simple_string", messages, config.clone()).await?;
    println!("Response: {}", response);

    println!("\n2. Using role-tagged messages:");
    let messages: Vec<LlmMessage> =
        serde_json::from_str(r#"[{"role": "user", "content": "Say hello in Spanish"}]"#)?;
    let response = invoke(runs, broker, "role_messages", messages, config.clone()).await?;
    println!("Response: {}", response);

    println!("\n3. Using system and user messages for translation:");
    let messages = vec![
        LlmMessage::system("Translate the following from English into Italian"),
        LlmMessage::user("hi!"),
    ];
    let response = invoke(runs, broker, "translation", messages, config.clone()).await?;
    println!("Response: {}", response);

    println!("\n=== STREAMING EXAMPLE ===");
    println!("Streaming tokens for 'Say hello in Italian':");
    print!("Tokens: ");
    let prompt = "Say hello in Italian";
    let stream_config = config.clone();
    runs.run("streaming", prompt, |correlation_id| async move {
        let messages = vec![LlmMessage::user(prompt)];
        let mut stream = broker.generate_stream(&messages, stream_config, Some(correlation_id));
        let mut streamed = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            print!("{}|", chunk);
            io::stdout().flush()?;
            streamed.push_str(&chunk);
        }
        Ok::<_, TeamError>(streamed)
    })
    .await?;
    println!("\nStreaming complete!");

    println!("\n=== BATCH EXAMPLE ===");
    let prompts = ["Say hello in German", "Say hello in Japanese", "Say hello in Portuguese"];
    let requests = prompts.iter().map(|prompt| {
        let messages = vec![LlmMessage::user(*prompt)];
        invoke(runs, broker, "batch", messages, config.clone())
    });
    for (prompt, result) in prompts.iter().zip(join_all(requests).await) {
        match result {
            Ok(response) => println!("{} -> {}", prompt, response),
            Err(e) => println!("{} -> error: {}", prompt, e),
        }
    }

    Ok(())
}
