//! Two-step chain: write a short poem about a topic, then judge its sentiment.

use crate::error::Result;
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage};
use serde::Serialize;
use tracing::debug;

/// Root run name of the chain's trace
pub const POEM_CHAIN_NAME: &str = "poem_chain";

pub fn poem_prompt(topic: &str) -> String {
    format!("Write a short poem about {}. Keep it under 4 lines.", topic)
}

pub fn sentiment_prompt(poem: &str) -> String {
    format!(
        "Analyze the sentiment of the following poem. Is it positive, negative, or neutral? Explain why.\n\nPoem: {}",
        poem
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoemAnalysis {
    pub topic: String,
    pub poem: String,
    pub sentiment_analysis: String,
}

pub struct PoemChain {
    poem_generator: LlmBroker,
    sentiment_analyzer: LlmBroker,
    config: CompletionConfig,
}

impl PoemChain {
    pub fn new(broker: LlmBroker, config: CompletionConfig) -> Self {
        Self {
            poem_generator: broker.clone().with_source("poem_generator"),
            sentiment_analyzer: broker.with_source("sentiment_analyzer"),
            config,
        }
    }

    /// Run both steps under `correlation_id`; the first failure ends the chain
    pub async fn run(&self, topic: &str, correlation_id: &str) -> Result<PoemAnalysis> {
        let poem = self
            .poem_generator
            .generate(
                &[LlmMessage::user(poem_prompt(topic))],
                None,
                Some(self.config.clone()),
                Some(correlation_id.to_string()),
            )
            .await?;
        debug!(topic, chars = poem.chars().count(), "Poem generated");

        let sentiment_analysis = self
            .sentiment_analyzer
            .generate(
                &[LlmMessage::user(sentiment_prompt(&poem))],
                None,
                Some(self.config.clone()),
                Some(correlation_id.to_string()),
            )
            .await?;

        Ok(PoemAnalysis {
            topic: topic.to_string(),
            poem,
            sentiment_analysis,
        })
    }
}
