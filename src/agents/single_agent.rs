//! One general assistant holding all three tools and its own transcript.

use crate::error::Result;
use crate::llm::tools::{CalculatorTool, CurrentWeatherTool, LlmTool, SearchWebTool};
use crate::llm::{CompletionConfig, LlmBroker, LlmMessage};
use crate::team::state::ChatMessage;
use uuid::Uuid;

const SINGLE_AGENT_PROMPT: &str = "You are a helpful AI assistant named LM Studio Agent. When asked to introduce yourself, \
explain that you are an AI assistant powered by a local LM Studio model and can help with \
various tasks including answering questions, providing information, and using tools.\n\n\
You have access to the following tools:\n\
- search_web: Search the web for information (only use for factual queries)\n\
- get_current_weather: Get the current weather in a location\n\
- calculate: Calculate the result of a mathematical expression\n\n\
Only use these tools when necessary to answer specific questions that require external information. \
For general conversation, introductions, or opinions, respond directly without using tools.\n\n\
When the user introduces themselves (e.g., 'I am Mark'), respond appropriately by acknowledging \
their name and asking how you can help them. Do not use tools for personal introductions.";

pub struct SingleAgent {
    broker: LlmBroker,
    tools: Vec<Box<dyn LlmTool>>,
    config: CompletionConfig,
    messages: Vec<ChatMessage>,
}

impl SingleAgent {
    pub fn new(broker: LlmBroker, config: CompletionConfig) -> Self {
        Self {
            broker: broker.with_source("single_agent"),
            tools: vec![
                Box::new(SearchWebTool),
                Box::new(CurrentWeatherTool),
                Box::new(CalculatorTool),
            ],
            config,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Run one turn. On failure the user message stays and nothing else is added.
    pub async fn send(&mut self, input: &str) -> Result<String> {
        self.messages.push(ChatMessage::user(input));

        let mut prompt = Vec::with_capacity(self.messages.len() + 1);
        prompt.push(LlmMessage::system(SINGLE_AGENT_PROMPT));
        prompt.extend(self.messages.iter().map(LlmMessage::from));

        let response = self
            .broker
            .generate(
                &prompt,
                Some(self.tools.as_slice()),
                Some(self.config.clone()),
                Some(Uuid::new_v4().to_string()),
            )
            .await?;

        self.messages.push(ChatMessage::assistant(response.clone()));
        Ok(response)
    }
}
