//! Specialist agents that answer a routed query.

use crate::agents::AgentKind;
use crate::error::Result;
use crate::llm::models::MessageRole;
use crate::llm::tools::LlmTool;
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage};
use crate::team::state::ChatMessage;
use tracing::debug;

/// One specialist: its instruction, its tools and a broker to run the tool loop
pub struct SpecialistAgent {
    kind: AgentKind,
    broker: LlmBroker,
    tools: Vec<Box<dyn LlmTool>>,
    config: CompletionConfig,
}

impl SpecialistAgent {
    pub fn new(kind: AgentKind, broker: LlmBroker, config: CompletionConfig) -> Self {
        Self {
            kind,
            broker: broker.with_source(kind.label()),
            tools: kind.tools(),
            config,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Instruction, replayed transcript, then the current input unless the
    /// transcript already ends with it
    pub fn prompt(&self, user_input: &str, history: &[ChatMessage]) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(LlmMessage::system(self.kind.system_prompt()));
        messages.extend(history.iter().map(LlmMessage::from));

        let already_asked = messages
            .last()
            .is_some_and(|m| m.role == MessageRole::User && m.content.as_deref() == Some(user_input));
        if !already_asked {
            messages.push(LlmMessage::user(user_input));
        }

        messages
    }

    /// Answer `user_input`, running this specialist's tools as the model asks
    pub async fn respond(
        &self,
        user_input: &str,
        history: &[ChatMessage],
        correlation_id: &str,
    ) -> Result<String> {
        let messages = self.prompt(user_input, history);
        let tools = (!self.tools.is_empty()).then_some(self.tools.as_slice());

        debug!(
            agent = %self.kind,
            history = history.len(),
            tools = self.tools.len(),
            "Specialist responding"
        );

        self.broker
            .generate(
                &messages,
                tools,
                Some(self.config.clone()),
                Some(correlation_id.to_string()),
            )
            .await
    }
}
