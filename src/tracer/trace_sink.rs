//! Publishes run trees to a LangSmith-compatible endpoint.
//!
//! Every top-level run (a chat turn, a demo step, a chain) becomes one root `chain`
//! run with child `llm` and `tool` runs rebuilt from the tracer records captured
//! under the run's correlation id.

use super::tracer_events::{LlmCallTracerEvent, LlmResponseTracerEvent, TracerRecord};
use crate::config::TraceSettings;
use crate::error::{Result, TeamError};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const SINK_TIMEOUT: Duration = Duration::from_secs(30);

/// Summary of one finished top-level run, used for the root run
#[derive(Debug, Clone)]
pub struct RunSummary<'a> {
    /// Root run name, e.g. `agent_team` or `poem_chain`
    pub name: &'a str,
    pub correlation_id: &'a str,
    pub input: &'a str,
    /// Name of the specialist that answered, when routing got that far
    pub agent: Option<&'a str>,
    /// Root outputs object on success, error text on failure
    pub outcome: std::result::Result<Value, String>,
    pub started_at: f64,
    pub finished_at: f64,
}

/// HTTP client for the run-trace endpoint
pub struct TraceSink {
    client: Client,
    settings: TraceSettings,
}

impl TraceSink {
    pub fn new(settings: TraceSettings) -> Result<Self> {
        let client = Client::builder().timeout(SINK_TIMEOUT).build()?;
        Ok(Self { client, settings })
    }

    pub fn project(&self) -> &str {
        &self.settings.project
    }

    /// Send one run tree in a single batch request
    pub async fn publish_run(&self, turn: &RunSummary<'_>, records: &[TracerRecord]) -> Result<()> {
        let runs = build_runs(turn, records, &self.settings.project);
        let url = format!("{}/runs/batch", self.settings.endpoint.trim_end_matches('/'));

        debug!(
            correlation_id = turn.correlation_id,
            runs = runs.len(),
            "Publishing run trace"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .json(&json!({ "post": runs }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TeamError::TraceError(format!("{} - {}", status, body)));
        }

        info!(correlation_id = turn.correlation_id, name = turn.name, "Run trace published");
        Ok(())
    }
}

fn to_datetime(timestamp: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros((timestamp * 1_000_000.0) as i64).unwrap_or_default()
}

fn iso(timestamp: f64) -> String {
    to_datetime(timestamp).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn dotted_segment(timestamp: f64, id: &Uuid) -> String {
    format!("{}{}", to_datetime(timestamp).format("%Y%m%dT%H%M%S%6fZ"), id)
}

struct RunBuilder<'a> {
    trace_id: Uuid,
    root_dotted: String,
    project: &'a str,
    runs: Vec<Value>,
}

impl RunBuilder<'_> {
    #[allow(clippy::too_many_arguments)]
    fn child(
        &mut self,
        name: &str,
        run_type: &str,
        start: f64,
        end: f64,
        inputs: Value,
        outputs: Value,
        error: Option<String>,
        metadata: Value,
    ) {
        let id = Uuid::new_v4();
        let mut run = json!({
            "id": id,
            "trace_id": self.trace_id,
            "parent_run_id": self.trace_id,
            "dotted_order": format!("{}.{}", self.root_dotted, dotted_segment(start, &id)),
            "name": name,
            "run_type": run_type,
            "inputs": inputs,
            "outputs": outputs,
            "start_time": iso(start),
            "end_time": iso(end),
            "session_name": self.project,
            "extra": { "metadata": metadata },
        });
        if let Some(error) = error {
            run["error"] = json!(error);
        }
        self.runs.push(run);
    }

    fn llm(&mut self, call: &LlmCallTracerEvent, response: Option<&LlmResponseTracerEvent>) {
        let end = response.map_or(call.timestamp, |r| r.timestamp);
        let outputs = response.map_or(Value::Null, |r| {
            json!({ "content": r.content, "tool_calls": r.tool_calls, "usage": r.usage })
        });
        let error = response.is_none().then(|| "no response recorded".to_string());

        self.child(
            &call.source,
            "llm",
            call.timestamp,
            end,
            json!({ "messages": call.messages }),
            outputs,
            error,
            json!({
                "ls_model_name": call.model,
                "ls_temperature": call.temperature,
                "tools": call.tools,
                "correlation_id": call.correlation_id,
            }),
        );
    }
}

/// Rebuild the run tree for one top-level run
pub fn build_runs(turn: &RunSummary<'_>, records: &[TracerRecord], project: &str) -> Vec<Value> {
    let trace_id = Uuid::new_v4();
    let root_dotted = dotted_segment(turn.started_at, &trace_id);

    let mut root = json!({
        "id": trace_id,
        "trace_id": trace_id,
        "parent_run_id": Value::Null,
        "dotted_order": root_dotted,
        "name": turn.name,
        "run_type": "chain",
        "inputs": { "input": turn.input },
        "outputs": Value::Null,
        "start_time": iso(turn.started_at),
        "end_time": iso(turn.finished_at),
        "session_name": project,
        "extra": { "metadata": {
            "correlation_id": turn.correlation_id,
            "agent": turn.agent,
        }},
    });
    match &turn.outcome {
        Ok(outputs) => root["outputs"] = outputs.clone(),
        Err(error) => root["error"] = json!(error),
    }

    let mut builder = RunBuilder {
        trace_id,
        root_dotted,
        project,
        runs: vec![root],
    };

    // Calls and responses from one source are strictly sequential
    let mut pending: Vec<&LlmCallTracerEvent> = Vec::new();
    for record in records {
        match record {
            TracerRecord::LlmCall(call) => pending.push(call),
            TracerRecord::LlmResponse(response) => {
                if let Some(pos) = pending.iter().position(|c| c.source == response.source) {
                    let call = pending.remove(pos);
                    builder.llm(call, Some(response));
                }
            }
            TracerRecord::ToolCall(tool) => {
                let start = tool.timestamp - tool.call_duration_ms.unwrap_or_default() / 1000.0;
                builder.child(
                    &tool.tool_name,
                    "tool",
                    start,
                    tool.timestamp,
                    json!(tool.arguments),
                    json!({ "output": tool.result }),
                    None,
                    json!({ "caller": tool.caller }),
                );
            }
            TracerRecord::AgentInteraction(interaction) => {
                builder.runs[0]["extra"]["metadata"]["routed_to"] = json!(interaction.to_agent);
            }
        }
    }
    for call in pending {
        builder.llm(call, None);
    }

    builder.runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::models::LlmMessage;
    use crate::tracer::tracer_events::{AgentInteractionTracerEvent, ToolCallTracerEvent};
    use std::collections::HashMap;

    const T0: f64 = 1_700_000_000.0;

    fn settings(endpoint: &str) -> TraceSettings {
        TraceSettings {
            api_key: "ls-test-key".to_string(),
            project: "agent-team-tests".to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    fn call(source: &str, timestamp: f64) -> TracerRecord {
        TracerRecord::LlmCall(LlmCallTracerEvent {
            timestamp,
            correlation_id: "turn-1".to_string(),
            source: source.to_string(),
            model: "local-model".to_string(),
            messages: vec![LlmMessage::user("What is 2 + 2?")],
            temperature: 0.7,
            tools: None,
        })
    }

    fn response(source: &str, timestamp: f64, content: &str) -> TracerRecord {
        TracerRecord::LlmResponse(LlmResponseTracerEvent {
            timestamp,
            correlation_id: "turn-1".to_string(),
            source: source.to_string(),
            model: "local-model".to_string(),
            content: content.to_string(),
            tool_calls: None,
            call_duration_ms: Some(10.0),
            usage: None,
        })
    }

    fn turn(outcome: std::result::Result<&str, String>) -> RunSummary<'static> {
        RunSummary {
            name: "agent_team",
            correlation_id: "turn-1",
            input: "What is 2 + 2?",
            agent: Some("math"),
            outcome: outcome.map(|output| json!({ "output": output })),
            started_at: T0,
            finished_at: T0 + 2.0,
        }
    }

    fn math_turn_records() -> Vec<TracerRecord> {
        vec![
            call("router", T0 + 0.1),
            response("router", T0 + 0.4, "Math Agent"),
            TracerRecord::AgentInteraction(AgentInteractionTracerEvent {
                timestamp: T0 + 0.4,
                correlation_id: "turn-1".to_string(),
                source: "workflow".to_string(),
                from_agent: "router".to_string(),
                to_agent: "math".to_string(),
                event_type: "dispatch".to_string(),
                event_id: None,
            }),
            call("math", T0 + 0.5),
            response("math", T0 + 0.9, ""),
            TracerRecord::ToolCall(ToolCallTracerEvent {
                timestamp: T0 + 1.0,
                correlation_id: "turn-1".to_string(),
                source: "math".to_string(),
                tool_name: "calculate".to_string(),
                arguments: HashMap::from([("expression".to_string(), json!("2 + 2"))]),
                result: json!("The result of 2 + 2 is 4"),
                caller: Some("math".to_string()),
                call_duration_ms: Some(1.0),
            }),
            call("math", T0 + 1.1),
            response("math", T0 + 1.8, "2 + 2 is 4."),
        ]
    }

    #[test]
    fn test_build_runs_tree_shape() {
        let runs = build_runs(&turn(Ok("2 + 2 is 4.")), &math_turn_records(), "proj");

        assert_eq!(runs.len(), 5);

        let root = &runs[0];
        assert_eq!(root["run_type"], "chain");
        assert_eq!(root["name"], "agent_team");
        assert!(root["parent_run_id"].is_null());
        assert_eq!(root["outputs"]["output"], "2 + 2 is 4.");
        assert_eq!(root["extra"]["metadata"]["routed_to"], "math");
        assert_eq!(root["session_name"], "proj");

        let types: Vec<&str> = runs[1..].iter().map(|r| r["run_type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["llm", "llm", "tool", "llm"]);

        for child in &runs[1..] {
            assert_eq!(child["trace_id"], root["id"]);
            assert_eq!(child["parent_run_id"], root["id"]);
            let dotted = child["dotted_order"].as_str().unwrap();
            assert!(dotted.starts_with(root["dotted_order"].as_str().unwrap()));
            assert!(dotted.contains('.'));
        }

        assert_eq!(runs[1]["name"], "router");
        assert_eq!(runs[1]["outputs"]["content"], "Math Agent");
        assert_eq!(runs[3]["name"], "calculate");
        assert_eq!(runs[3]["inputs"]["expression"], "2 + 2");
    }

    #[test]
    fn test_dotted_order_format() {
        let id = Uuid::nil();
        let segment = dotted_segment(T0, &id);
        assert_eq!(segment, format!("20231114T221320000000Z{}", id));
    }

    #[test]
    fn test_failed_turn_marks_root_and_unanswered_call() {
        let records = vec![call("router", T0 + 0.1)];
        let runs = build_runs(&turn(Err("HTTP error: timed out".to_string())), &records, "proj");

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0]["error"], "HTTP error: timed out");
        assert_eq!(runs[1]["error"], "no response recorded");
    }

    #[tokio::test]
    async fn test_publish_run_posts_batch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/runs/batch")
            .match_header("x-api-key", "ls-test-key")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex(r#"^\{"post":\["#.to_string()),
                mockito::Matcher::Regex(r#""name":"agent_team""#.to_string()),
                mockito::Matcher::Regex(r#""session_name":"agent-team-tests""#.to_string()),
            ]))
            .with_status(202)
            .with_body("{}")
            .create_async()
            .await;

        let sink = TraceSink::new(settings(&server.url())).unwrap();
        sink.publish_run(&turn(Ok("hi")), &[]).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_run_error_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/runs/batch")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let sink = TraceSink::new(settings(&format!("{}/", server.url()))).unwrap();
        let result = sink.publish_run(&turn(Ok("hi")), &[]).await;

        match result {
            Err(TeamError::TraceError(msg)) => assert!(msg.contains("401")),
            other => panic!("Expected TraceError, got {:?}", other),
        }
        mock.assert_async().await;
    }
}
