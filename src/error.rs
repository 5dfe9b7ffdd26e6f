//! Error types and result aliases for the agent team.
//!
//! This module defines the core error type [`TeamError`] and the [`Result`] type alias
//! used throughout the library. Backend and network failures surface as `TeamError`
//! and propagate to the console loop; tool failures never do, they are turned into
//! text for the model at the tool boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Tool error: {0}")]
    ToolError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Agent error: {0}")]
    AgentError(String),

    #[error("Trace export error: {0}")]
    TraceError(String),
}

pub type Result<T> = std::result::Result<T, TeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = TeamError::GatewayError("connection failed".to_string());
        assert_eq!(err.to_string(), "LLM gateway error: connection failed");
    }

    #[test]
    fn test_tool_error_display() {
        let err = TeamError::ToolError("invalid parameters".to_string());
        assert_eq!(err.to_string(), "Tool error: invalid parameters");
    }

    #[test]
    fn test_config_error_display() {
        let err = TeamError::ConfigError("LLM_TEMPERATURE is not a number".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: LLM_TEMPERATURE is not a number");
    }

    #[test]
    fn test_agent_error_display() {
        let err = TeamError::AgentError("router produced no answer".to_string());
        assert_eq!(err.to_string(), "Agent error: router produced no answer");
    }

    #[test]
    fn test_trace_error_display() {
        let err = TeamError::TraceError("401 Unauthorized".to_string());
        assert_eq!(err.to_string(), "Trace export error: 401 Unauthorized");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TeamError = json_err.into();

        match err {
            TeamError::SerializationError(_) => {}
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err: TeamError = io_err.into();

        match err {
            TeamError::IoError(_) => {}
            _ => panic!("Expected IoError"),
        }
    }
}
