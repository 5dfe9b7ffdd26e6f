//! Tracer event types for tracking system interactions
//!
//! This module defines the event types recorded by the tracer system: LLM calls and
//! responses, tool executions, and hand-offs between agents. All events implement the
//! `TracerEvent` trait which provides timestamps, correlation IDs, and printable summaries.

use crate::llm::models::{LlmMessage, LlmToolCall, TokenUsage};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for filtering tracer events
pub trait EventFilterFn: Send + Sync {
    /// Test whether an event passes the filter
    fn matches(&self, event: &dyn TracerEvent) -> bool;
}

impl<F> EventFilterFn for F
where
    F: Fn(&dyn TracerEvent) -> bool + Send + Sync,
{
    fn matches(&self, event: &dyn TracerEvent) -> bool {
        self(event)
    }
}

/// Base trait for all tracer events
pub trait TracerEvent: Send + Sync {
    /// Get the timestamp when the event occurred
    fn timestamp(&self) -> f64;

    /// Get the correlation ID for tracing related events
    fn correlation_id(&self) -> &str;

    /// Get the source of the event
    fn source(&self) -> &str;

    /// Get a formatted string summary of the event
    fn printable_summary(&self) -> String;

    /// Owned, typed copy of the event for exporters
    fn to_record(&self) -> TracerRecord;
}

/// Typed snapshot of any tracer event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TracerRecord {
    LlmCall(LlmCallTracerEvent),
    LlmResponse(LlmResponseTracerEvent),
    ToolCall(ToolCallTracerEvent),
    AgentInteraction(AgentInteractionTracerEvent),
}

impl TracerRecord {
    pub fn timestamp(&self) -> f64 {
        match self {
            TracerRecord::LlmCall(e) => e.timestamp,
            TracerRecord::LlmResponse(e) => e.timestamp,
            TracerRecord::ToolCall(e) => e.timestamp,
            TracerRecord::AgentInteraction(e) => e.timestamp,
        }
    }
}

fn format_time(timestamp: f64) -> String {
    let dt = DateTime::from_timestamp_millis((timestamp * 1000.0) as i64)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%H:%M:%S%.3f").to_string()
}

fn preview(text: &str) -> String {
    if text.chars().count() > 100 {
        format!("{}...", text.chars().take(100).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Records when an LLM is called with specific messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmCallTracerEvent {
    /// Timestamp when the event occurred (Unix timestamp)
    pub timestamp: f64,
    /// UUID string that is copied from cause-to-effect for tracing events
    pub correlation_id: String,
    /// Source of the event
    pub source: String,
    /// The LLM model that was used
    pub model: String,
    /// The messages sent to the LLM
    pub messages: Vec<LlmMessage>,
    /// The temperature setting used for the call
    pub temperature: f64,
    /// Names of the tools offered to the LLM, if any
    pub tools: Option<Vec<String>>,
}

impl TracerEvent for LlmCallTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] LlmCallTracerEvent (correlation_id: {})\n   Model: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.model
        );

        if !self.messages.is_empty() {
            let msg_count = self.messages.len();
            let plural = if msg_count != 1 { "s" } else { "" };
            summary.push_str(&format!("\n   Messages: {} message{}", msg_count, plural));
        }

        summary.push_str(&format!("\n   Temperature: {}", self.temperature));

        if let Some(tools) = &self.tools {
            if !tools.is_empty() {
                summary.push_str(&format!("\n   Available Tools: {}", tools.join(", ")));
            }
        }

        summary
    }

    fn to_record(&self) -> TracerRecord {
        TracerRecord::LlmCall(self.clone())
    }
}

/// Records when an LLM responds to a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponseTracerEvent {
    pub timestamp: f64,
    pub correlation_id: String,
    pub source: String,
    pub model: String,
    /// The text content of the LLM response
    pub content: String,
    /// Any tool calls requested by the LLM
    pub tool_calls: Option<Vec<LlmToolCall>>,
    /// Duration of the LLM call in milliseconds
    pub call_duration_ms: Option<f64>,
    /// Token accounting, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl TracerEvent for LlmResponseTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] LlmResponseTracerEvent (correlation_id: {})\n   Model: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.model
        );

        if !self.content.is_empty() {
            summary.push_str(&format!("\n   Content: {}", preview(&self.content)));
        }

        if let Some(tool_calls) = &self.tool_calls {
            let tool_count = tool_calls.len();
            let plural = if tool_count != 1 { "s" } else { "" };
            summary.push_str(&format!("\n   Tool Calls: {} call{}", tool_count, plural));
        }

        if let Some(duration) = self.call_duration_ms {
            summary.push_str(&format!("\n   Duration: {:.2}ms", duration));
        }

        if let Some(usage) = &self.usage {
            summary.push_str(&format!(
                "\n   Tokens: {} prompt + {} completion",
                usage.prompt_tokens, usage.completion_tokens
            ));
        }

        summary
    }

    fn to_record(&self) -> TracerRecord {
        TracerRecord::LlmResponse(self.clone())
    }
}

/// Records when a tool is called during agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallTracerEvent {
    pub timestamp: f64,
    pub correlation_id: String,
    pub source: String,
    /// Name of the tool that was called
    pub tool_name: String,
    /// Arguments provided to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Result returned by the tool (as JSON value)
    pub result: serde_json::Value,
    /// Name of the agent or component that called the tool
    pub caller: Option<String>,
    /// Duration of the tool call in milliseconds
    pub call_duration_ms: Option<f64>,
}

impl TracerEvent for ToolCallTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] ToolCallTracerEvent (correlation_id: {})\n   Tool: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.tool_name
        );

        if !self.arguments.is_empty() {
            summary.push_str(&format!("\n   Arguments: {:?}", self.arguments));
        }

        summary.push_str(&format!("\n   Result: {}", preview(&self.result.to_string())));

        if let Some(caller) = &self.caller {
            summary.push_str(&format!("\n   Caller: {}", caller));
        }

        if let Some(duration) = self.call_duration_ms {
            summary.push_str(&format!("\n   Duration: {:.2}ms", duration));
        }

        summary
    }

    fn to_record(&self) -> TracerRecord {
        TracerRecord::ToolCall(self.clone())
    }
}

/// Records a hand-off between agents, e.g. router to specialist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInteractionTracerEvent {
    pub timestamp: f64,
    pub correlation_id: String,
    pub source: String,
    /// Name of the agent handing off
    pub from_agent: String,
    /// Name of the agent receiving the work
    pub to_agent: String,
    /// Kind of interaction
    pub event_type: String,
    pub event_id: Option<String>,
}

impl TracerEvent for AgentInteractionTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] AgentInteractionTracerEvent (correlation_id: {})\n   From: {} -> To: {}\n   Event Type: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.from_agent,
            self.to_agent,
            self.event_type
        );

        if let Some(event_id) = &self.event_id {
            summary.push_str(&format!("\n   Event ID: {}", event_id));
        }

        summary
    }

    fn to_record(&self) -> TracerRecord {
        TracerRecord::AgentInteraction(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: f64 = 1_700_000_000.25;

    #[test]
    fn test_llm_call_event() {
        let event = LlmCallTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "test-123".to_string(),
            source: "router".to_string(),
            model: "local-model".to_string(),
            messages: vec![LlmMessage::system("Route"), LlmMessage::user("Hi")],
            temperature: 0.7,
            tools: Some(vec!["search_web".to_string()]),
        };

        let summary = event.printable_summary();
        assert!(summary.contains("LlmCallTracerEvent"));
        assert!(summary.contains("test-123"));
        assert!(summary.contains("Messages: 2 messages"));
        assert!(summary.contains("Available Tools: search_web"));
        assert!(matches!(event.to_record(), TracerRecord::LlmCall(_)));
    }

    #[test]
    fn test_llm_response_event() {
        let event = LlmResponseTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "test-456".to_string(),
            source: "conversation".to_string(),
            model: "local-model".to_string(),
            content: "Hello, Mark!".to_string(),
            tool_calls: None,
            call_duration_ms: Some(150.5),
            usage: Some(TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 4,
                total_tokens: 14,
            }),
        };

        let summary = event.printable_summary();
        assert!(summary.contains("LlmResponseTracerEvent"));
        assert!(summary.contains("Hello, Mark!"));
        assert!(summary.contains("150.50ms"));
        assert!(summary.contains("10 prompt + 4 completion"));
    }

    #[test]
    fn test_long_content_preview_respects_char_boundaries() {
        let event = LlmResponseTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "c".to_string(),
            source: "research".to_string(),
            model: "m".to_string(),
            content: "í".repeat(150),
            tool_calls: None,
            call_duration_ms: None,
            usage: None,
        };

        let summary = event.printable_summary();
        assert!(summary.contains(&format!("{}...", "í".repeat(100))));
    }

    #[test]
    fn test_tool_call_event() {
        let mut args = HashMap::new();
        args.insert("expression".to_string(), serde_json::json!("2 + 2"));

        let event = ToolCallTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "test-789".to_string(),
            source: "math".to_string(),
            tool_name: "calculate".to_string(),
            arguments: args,
            result: serde_json::json!("The result of 2 + 2 is 4"),
            caller: Some("math".to_string()),
            call_duration_ms: Some(0.1),
        };

        let summary = event.printable_summary();
        assert!(summary.contains("ToolCallTracerEvent"));
        assert!(summary.contains("calculate"));
        assert!(summary.contains("Caller: math"));
    }

    #[test]
    fn test_agent_interaction_event() {
        let event = AgentInteractionTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "test-abc".to_string(),
            source: "workflow".to_string(),
            from_agent: "router".to_string(),
            to_agent: "weather".to_string(),
            event_type: "dispatch".to_string(),
            event_id: None,
        };

        let summary = event.printable_summary();
        assert!(summary.contains("From: router -> To: weather"));
        assert!(summary.contains("Event Type: dispatch"));
    }

    #[test]
    fn test_record_serializes_with_type_tag() {
        let record = AgentInteractionTracerEvent {
            timestamp: TIMESTAMP,
            correlation_id: "c".to_string(),
            source: "workflow".to_string(),
            from_agent: "router".to_string(),
            to_agent: "math".to_string(),
            event_type: "dispatch".to_string(),
            event_id: None,
        }
        .to_record();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "AgentInteraction");
        assert_eq!(record.timestamp(), TIMESTAMP);
    }
}
