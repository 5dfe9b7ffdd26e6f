//! Router agent that picks the specialist for a user query.

use crate::agents::AgentKind;
use crate::error::Result;
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage};
use tracing::info;

const ROUTER_PROMPT: &str = "You are the Router Agent, responsible for analyzing the user's query and deciding which specialist \
agent should handle it. Your job is to route the query to the most appropriate agent based on the \
content of the query.\n\n\
You have access to the following specialist agents:\n\
1. Research Agent - For factual questions, information retrieval, and knowledge-based queries\n\
2. Math Agent - For calculations, mathematical problems, and numerical analysis\n\
3. Weather Agent - For weather-related questions and forecasts\n\
4. Conversation Agent - For general conversation, greetings, opinions, and personal interactions\n\n\
Respond ONLY with the name of the agent that should handle the query. Do not add any explanation.";

/// Classifies one utterance with a single tool-free completion
pub struct RouterAgent {
    broker: LlmBroker,
    config: CompletionConfig,
}

impl RouterAgent {
    pub fn new(broker: LlmBroker, config: CompletionConfig) -> Self {
        Self {
            broker: broker.with_source("router"),
            config,
        }
    }

    /// The two-message prompt sent for `user_input`
    pub fn prompt(user_input: &str) -> Vec<LlmMessage> {
        vec![
            LlmMessage::system(ROUTER_PROMPT),
            LlmMessage::user(format!(
                "Route this query to the appropriate agent: '{}'",
                user_input
            )),
        ]
    }

    /// Decide which specialist handles `user_input`. Backend failures propagate.
    pub async fn route(&self, user_input: &str, correlation_id: &str) -> Result<AgentKind> {
        let answer = self
            .broker
            .generate(
                &Self::prompt(user_input),
                None,
                Some(self.config.clone()),
                Some(correlation_id.to_string()),
            )
            .await?;

        let kind = AgentKind::from_router_answer(&answer);
        info!(answer = %answer.trim(), agent = %kind, "Router decision");
        Ok(kind)
    }
}
