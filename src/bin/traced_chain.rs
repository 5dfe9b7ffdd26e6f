//! Traced chain: write a poem about a topic, then analyze its sentiment.
//!
//! Both model calls share one correlation id, so with tracing enabled the whole
//! chain shows up as a single trace.
//!
//! Run with: cargo run --bin traced-chain

use agent_team::agents::POEM_CHAIN_NAME;
use agent_team::console;
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
    println!("\n{}", config.tracing);

    let runs = TracedRuns::from_config(&config.tracing)?;
    let gateway = Arc::new(OpenAIGateway::with_config(config.backend.clone())?);
    let broker = LlmBroker::new(config.model.clone(), gateway, Some(runs.tracer().clone()));
    let chain = PoemChain::new(broker, config.completion.clone());

    println!("\n=== RUNNING CHAIN WITH LANGSMITH TRACING ===");
    println!("This chain will generate a poem and analyze its sentiment.");

    let mut stdin = io::stdin().lock();
    let Some(line) = console::read_line(&mut stdin, "\nEnter a topic for the poem: ")? else {
        return Ok(());
    };
    let topic = line.trim();

    let result = runs
        .run(POEM_CHAIN_NAME, topic, |correlation_id| {
            let chain = &chain;
            async move { chain.run(topic, &correlation_id).await }
        })
        .await;

    match result {
        Ok(analysis) => {
            println!("\n=== RESULTS ===");
            println!("Topic: {}", analysis.topic);
            println!("\nPoem:\n{}", analysis.poem);
            println!("\nSentiment Analysis:\n{}", analysis.sentiment_analysis);
        }
        Err(e) => {
            println!("\nError occurred: {}", e);
            println!("Make sure:");
            println!("1. LM Studio is running");
            println!("2. Server is started in LM Studio");
            println!("3. Port 1234 is correct");
        }
    }

    if runs.is_publishing() {
        println!("\n=== LANGSMITH TRACE ===");
        println!("Check your LangSmith dashboard to see the full trace of this run.");
        println!("URL: https://smith.langchain.com/");
        println!("\nThe trace will show:");
        println!("- The input to each step");
        println!("- The output from each step");
        println!("- The time taken for each step");
        println!("- Any errors that occurred");
        println!("- Token usage (when the server reports it)");
    }

    Ok(())
}
