pub mod broker;
pub mod gateway;
pub mod gateways;
pub mod models;
pub mod tools;

pub use broker::{LlmBroker, DEFAULT_MAX_ITERATIONS, ITERATION_LIMIT_MESSAGE};
pub use gateway::{CompletionConfig, ContentStream, LlmGateway};
pub use models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole, TokenUsage};
pub use tools::{FunctionDescriptor, LlmTool, ToolDescriptor};
