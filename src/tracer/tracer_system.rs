//! Tracer system for coordinating tracer events
//!
//! Central place for recording, filtering, and querying tracer events. Components that
//! want tracing receive an `Arc<TracerSystem>` explicitly; there is no global tracer.

use super::event_store::EventStore;
use super::tracer_events::*;
use crate::llm::models::{LlmMessage, LlmToolCall, TokenUsage};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Central system for capturing and querying tracer events
///
/// A tracer only exists when tracing is wanted, so every record call stores.
#[derive(Default)]
pub struct TracerSystem {
    event_store: EventStore,
}

impl TracerSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an LLM call event
    pub fn record_llm_call(
        &self,
        model: impl Into<String>,
        messages: &[LlmMessage],
        temperature: f64,
        tools: Option<Vec<String>>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        self.event_store.store(Box::new(LlmCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            model: model.into(),
            messages: messages.to_vec(),
            temperature,
            tools,
        }));
    }

    /// Record an LLM response event
    #[allow(clippy::too_many_arguments)]
    pub fn record_llm_response(
        &self,
        model: impl Into<String>,
        content: impl Into<String>,
        tool_calls: Option<Vec<LlmToolCall>>,
        call_duration_ms: Option<f64>,
        usage: Option<TokenUsage>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        self.event_store.store(Box::new(LlmResponseTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            model: model.into(),
            content: content.into(),
            tool_calls,
            call_duration_ms,
            usage,
        }));
    }

    /// Record a tool call event
    #[allow(clippy::too_many_arguments)]
    pub fn record_tool_call(
        &self,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        result: serde_json::Value,
        caller: Option<String>,
        call_duration_ms: Option<f64>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        self.event_store.store(Box::new(ToolCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            tool_name: tool_name.into(),
            arguments,
            result,
            caller,
            call_duration_ms,
        }));
    }

    /// Record an agent interaction event
    pub fn record_agent_interaction(
        &self,
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        event_type: impl Into<String>,
        event_id: Option<String>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        self.event_store.store(Box::new(AgentInteractionTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            event_type: event_type.into(),
            event_id,
        }));
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.event_store.get_last_n_summaries(n, filter_func)
    }

    /// Typed copies of every event recorded under one correlation id
    pub fn records_for(&self, correlation_id: &str) -> Vec<TracerRecord> {
        let filter = |e: &dyn TracerEvent| e.correlation_id() == correlation_id;
        self.event_store.get_records(Some(&filter))
    }

    pub fn clear(&self) {
        self.event_store.clear();
    }

    pub fn len(&self) -> usize {
        self.event_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_store.is_empty()
    }
}

/// Get current timestamp as Unix timestamp (seconds since epoch)
pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracer_system() {
        let tracer = TracerSystem::new();
        assert_eq!(tracer.len(), 0);
    }

    #[test]
    fn test_record_each_event_kind() {
        let tracer = TracerSystem::default();

        tracer.record_llm_call("local-model", &[LlmMessage::user("Hi")], 0.7, None, "router", "c1");
        tracer.record_llm_response("local-model", "math", None, Some(12.0), None, "router", "c1");
        tracer.record_tool_call(
            "calculate",
            HashMap::new(),
            serde_json::json!("The result of 2 + 2 is 4"),
            Some("math".to_string()),
            Some(0.2),
            "math",
            "c1",
        );
        tracer.record_agent_interaction("router", "math", "dispatch", None, "workflow", "c1");

        assert_eq!(tracer.len(), 4);
    }

    #[test]
    fn test_last_n_summaries_filtered() {
        let tracer = TracerSystem::new();
        tracer.record_llm_call("local-model", &[], 0.7, None, "router", "turn-1");
        tracer.record_agent_interaction("router", "weather", "dispatch", None, "workflow", "turn-1");
        tracer.record_agent_interaction("router", "math", "dispatch", None, "workflow", "turn-2");

        let filter = |e: &dyn TracerEvent| e.correlation_id() == "turn-1";
        let summaries = tracer.get_last_n_summaries(1, Some(&filter));

        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].contains("weather"));
    }

    #[test]
    fn test_records_for_correlation_id() {
        let tracer = TracerSystem::default();

        tracer.record_llm_call("local-model", &[], 0.7, None, "router", "turn-1");
        tracer.record_llm_call("local-model", &[], 0.7, None, "router", "turn-2");
        tracer.record_agent_interaction("router", "weather", "dispatch", None, "workflow", "turn-1");

        let records = tracer.records_for("turn-1");
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0], TracerRecord::LlmCall(_)));
        assert!(matches!(records[1], TracerRecord::AgentInteraction(_)));
    }

    #[test]
    fn test_clear() {
        let tracer = TracerSystem::default();
        tracer.record_llm_call("local-model", &[], 1.0, None, "test", "corr-123");

        tracer.clear();
        assert!(tracer.is_empty());
    }
}
