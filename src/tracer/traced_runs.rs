//! Runs top-level units of work under fresh correlation ids.
//!
//! Each run's events are gathered from the tracer and, when a sink is configured,
//! published as one trace once the work finishes.

use super::trace_sink::{RunSummary, TraceSink};
use super::tracer_system::{current_timestamp, TracerSystem};
use crate::config::TraceConfig;
use crate::error::Result;
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

pub struct TracedRuns {
    tracer: Arc<TracerSystem>,
    sink: Option<TraceSink>,
}

impl TracedRuns {
    pub fn new(tracer: Arc<TracerSystem>, sink: Option<TraceSink>) -> Self {
        Self { tracer, sink }
    }

    /// Always records locally; publishes only when tracing is enabled
    pub fn from_config(config: &TraceConfig) -> Result<Self> {
        let sink = config.settings().cloned().map(TraceSink::new).transpose()?;
        Ok(Self::new(Arc::new(TracerSystem::new()), sink))
    }

    pub fn tracer(&self) -> &Arc<TracerSystem> {
        &self.tracer
    }

    pub fn is_publishing(&self) -> bool {
        self.sink.is_some()
    }

    /// Run `work` with a new correlation id and publish what it recorded
    ///
    /// The work's result is returned unchanged; publish failures are only logged.
    pub async fn run<T, F, Fut>(&self, name: &str, input: &str, work: F) -> Result<T>
    where
        T: Serialize,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let correlation_id = Uuid::new_v4().to_string();
        let started_at = current_timestamp();

        let result = work(correlation_id.clone()).await;

        if let Some(sink) = &self.sink {
            let summary = RunSummary {
                name,
                correlation_id: &correlation_id,
                input,
                agent: None,
                outcome: result.as_ref().map(outputs).map_err(|e| e.to_string()),
                started_at,
                finished_at: current_timestamp(),
            };
            let records = self.tracer.records_for(&correlation_id);
            if let Err(e) = sink.publish_run(&summary, &records).await {
                warn!(error = %e, name, correlation_id = %correlation_id, "Failed to publish run trace");
            }
        }

        result
    }
}

/// Structs become the outputs object as-is; anything else is wrapped as `output`
fn outputs<T: Serialize>(value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => json!({ "output": other }),
        Err(e) => json!({ "output": Value::Null, "serialization_error": e.to_string() }),
    }
}
