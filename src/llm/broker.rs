use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, ContentStream, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, LlmToolCall};
use crate::llm::tools::LlmTool;
use crate::tracer::TracerSystem;
use futures::stream::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Backend calls allowed per `generate` before giving up
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Answer returned when the tool loop runs out of iterations
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit.";

/// Main interface for LLM interactions
///
/// Owns the tool-use loop: the model is called, requested tools are run and their
/// output is fed back, until the model answers without asking for a tool.
#[derive(Clone)]
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
    tracer: Option<Arc<TracerSystem>>,
    source: String,
    max_iterations: usize,
}

impl LlmBroker {
    /// Create a new LLM broker
    ///
    /// # Arguments
    ///
    /// * `model` - Model name passed to the gateway on every call
    /// * `gateway` - Backend implementation
    /// * `tracer` - Optional tracer that receives LLM and tool events
    pub fn new(
        model: impl Into<String>,
        gateway: Arc<dyn LlmGateway>,
        tracer: Option<Arc<TracerSystem>>,
    ) -> Self {
        Self {
            model: model.into(),
            gateway,
            tracer,
            source: "broker".to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Name recorded as the source of this broker's tracer events
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn gateway(&self) -> &Arc<dyn LlmGateway> {
        &self.gateway
    }

    /// Generate a text response, running requested tools until the model is done
    ///
    /// Problems with individual tool calls (unparseable arguments, unknown tool,
    /// failing tool) become observations for the model. Only backend failures are
    /// returned as errors.
    pub async fn generate(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: Option<CompletionConfig>,
        correlation_id: Option<String>,
    ) -> Result<String> {
        let config = config.unwrap_or_default();
        let correlation_id = correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut current_messages = messages.to_vec();

        for iteration in 0..self.max_iterations {
            let response = self
                .complete_traced(&current_messages, tools, &config, &correlation_id)
                .await?;

            if response.tool_calls.is_empty() {
                return Ok(response.content.unwrap_or_default());
            }

            let Some(tools) = tools else {
                warn!("LLM requested tool calls but no tools provided");
                return Ok(response.content.unwrap_or_default());
            };

            info!(
                source = %self.source,
                iteration = iteration + 1,
                "Tool calls requested: {}",
                response.tool_calls.len()
            );

            current_messages.push(LlmMessage::tool_request(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for tool_call in &response.tool_calls {
                let observation = self.run_tool(tool_call, tools, &correlation_id);
                current_messages.push(LlmMessage::tool_result(tool_call, observation));
            }
        }

        warn!(
            source = %self.source,
            max_iterations = self.max_iterations,
            "Tool loop hit its iteration limit"
        );
        Ok(ITERATION_LIMIT_MESSAGE.to_string())
    }

    async fn complete_traced(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
        correlation_id: &str,
    ) -> Result<LlmGatewayResponse> {
        if let Some(tracer) = &self.tracer {
            let tool_names = tools.map(|tools| {
                tools.iter().map(|t| t.descriptor().function.name).collect::<Vec<_>>()
            });
            tracer.record_llm_call(
                &self.model,
                messages,
                config.temperature as f64,
                tool_names,
                &self.source,
                correlation_id,
            );
        }

        let started = Instant::now();
        let response = self.gateway.complete(&self.model, messages, tools, config).await?;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        debug!(source = %self.source, duration_ms, "LLM call completed");

        if let Some(tracer) = &self.tracer {
            let tool_calls = (!response.tool_calls.is_empty()).then(|| response.tool_calls.clone());
            tracer.record_llm_response(
                &self.model,
                response.content.clone().unwrap_or_default(),
                tool_calls,
                Some(duration_ms),
                response.usage,
                &self.source,
                correlation_id,
            );
        }

        Ok(response)
    }

    /// Run one requested tool and describe the outcome for the model
    fn run_tool(
        &self,
        tool_call: &LlmToolCall,
        tools: &[Box<dyn LlmTool>],
        correlation_id: &str,
    ) -> String {
        if let Some(raw) = &tool_call.malformed_arguments {
            warn!(tool = %tool_call.name, "Tool call arguments were not a JSON object");
            return format!(
                "Could not parse the arguments for {}: '{}'. Arguments must be a JSON object.",
                tool_call.name, raw
            );
        }

        let Some(tool) = tools.iter().find(|t| t.matches(&tool_call.name)) else {
            warn!("Tool not found: {}", tool_call.name);
            let names: Vec<String> = tools.iter().map(|t| t.descriptor().function.name).collect();
            return format!(
                "{} is not a valid tool, try one of [{}].",
                tool_call.name,
                names.join(", ")
            );
        };

        info!("Executing tool: {}", tool_call.name);
        let started = Instant::now();
        let result = tool.run(&tool_call.arguments);
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let observation = match result {
            Ok(Value::String(text)) => text,
            Ok(other) => other.to_string(),
            Err(e) => {
                warn!(tool = %tool_call.name, error = %e, "Tool execution failed");
                format!("Error running {}: {}", tool_call.name, e)
            }
        };

        if let Some(tracer) = &self.tracer {
            tracer.record_tool_call(
                &tool_call.name,
                tool_call.arguments.clone(),
                Value::String(observation.clone()),
                Some(self.source.clone()),
                Some(duration_ms),
                &self.source,
                correlation_id,
            );
        }

        observation
    }

    /// Stream a plain completion fragment by fragment
    ///
    /// No tools are offered on the streaming path.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::stream::StreamExt;
    ///
    /// let messages = vec![LlmMessage::user("Say hello in Italian")];
    /// let mut stream = broker.generate_stream(&messages, None, None);
    /// while let Some(chunk) = stream.next().await {
    ///     print!("{}|", chunk?);
    /// }
    /// ```
    pub fn generate_stream<'a>(
        &'a self,
        messages: &'a [LlmMessage],
        config: Option<CompletionConfig>,
        correlation_id: Option<String>,
    ) -> ContentStream<'a> {
        let config = config.unwrap_or_default();
        let correlation_id = correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        Box::pin(async_stream::stream! {
            if let Some(tracer) = &self.tracer {
                tracer.record_llm_call(
                    &self.model,
                    messages,
                    config.temperature as f64,
                    None,
                    &self.source,
                    &correlation_id,
                );
            }

            let started = Instant::now();
            let mut accumulated = String::new();
            let mut stream = self.gateway.complete_stream(&self.model, messages, &config);

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(content) => {
                        accumulated.push_str(&content);
                        yield Ok(content);
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            if let Some(tracer) = &self.tracer {
                tracer.record_llm_response(
                    &self.model,
                    accumulated,
                    None,
                    Some(started.elapsed().as_secs_f64() * 1000.0),
                    None,
                    &self.source,
                    &correlation_id,
                );
            }
        })
    }
}
