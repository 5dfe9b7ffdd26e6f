//! Router-based multi-agent chat over OpenAI-compatible model servers.
//!
//! A router agent classifies each user utterance as research, math, weather or
//! conversation and hands it to the matching specialist. Specialists answer through
//! a bounded tool-use loop over mock tools. Optional tracing captures every LLM call,
//! tool call and hand-off, and can publish each turn as a run tree.

pub mod agents;
pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod team;
pub mod tracer;

pub use error::{Result, TeamError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agents::{AgentKind, PoemChain, SingleAgent};
    pub use crate::config::{AppConfig, TraceConfig};
    pub use crate::error::{Result, TeamError};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::tools::{calculate, get_current_weather, search_web, LlmTool};
    pub use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole};
    pub use crate::team::{ConsoleInput, ConversationState, TeamSession, TurnReply};
    pub use crate::tracer::{TracedRuns, TracerSystem};
}
