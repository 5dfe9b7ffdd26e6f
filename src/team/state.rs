//! Conversation state shared by the router workflow.

use crate::agents::AgentKind;
use crate::llm::models::{LlmMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// Who said a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for LlmMessage {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::System => MessageRole::System,
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        };
        LlmMessage {
            role,
            content: Some(message.content.clone()),
            tool_calls: None,
        }
    }
}

/// Transcript plus the fields of the turn in flight
///
/// `messages` only ever grows. The other three fields describe the current turn and
/// are overwritten when the next one starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub user_input: Option<String>,
    pub current_agent: Option<AgentKind>,
    pub final_response: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new user utterance and reset the per-turn fields
    pub fn begin_turn(&mut self, input: impl Into<String>) {
        let input = input.into();
        self.messages.push(ChatMessage::user(input.clone()));
        self.user_input = Some(input);
        self.current_agent = None;
        self.final_response = None;
    }

    /// Take the workflow's result and append the answer to the transcript
    ///
    /// Returns the agent and answer of the finished turn, or `None` when the
    /// workflow did not produce both.
    pub fn complete_turn(&mut self, result: ConversationState) -> Option<(AgentKind, String)> {
        let agent = result.current_agent?;
        let response = result.final_response?;

        self.messages.push(ChatMessage::assistant(response.clone()));
        self.current_agent = Some(agent);
        self.final_response = Some(response.clone());
        Some((agent, response))
    }

    /// Transcript in backend message form
    pub fn history(&self) -> Vec<LlmMessage> {
        self.messages.iter().map(LlmMessage::from).collect()
    }
}
