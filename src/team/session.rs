//! A console chat session driving the team workflow one turn at a time.

use crate::agents::AgentKind;
use crate::config::AppConfig;
use crate::error::{Result, TeamError};
use crate::llm::gateways::OpenAIGateway;
use crate::llm::LlmBroker;
use crate::team::state::ConversationState;
use crate::team::workflow::TeamWorkflow;
use crate::tracer::{current_timestamp, RunSummary, TraceSink, TracerSystem};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

/// Root run name of a published chat turn
const TURN_RUN_NAME: &str = "agent_team";

/// What a console line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput<'a> {
    Exit,
    Empty,
    Message(&'a str),
}

impl<'a> ConsoleInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ConsoleInput::Empty
        } else if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
            ConsoleInput::Exit
        } else {
            ConsoleInput::Message(trimmed)
        }
    }
}

/// Result of one successful turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub agent: AgentKind,
    pub response: String,
    pub correlation_id: String,
}

/// Owns the conversation for the lifetime of one console session
pub struct TeamSession {
    workflow: TeamWorkflow,
    state: ConversationState,
    tracer: Option<Arc<TracerSystem>>,
    sink: Option<TraceSink>,
}

impl TeamSession {
    pub fn new(
        workflow: TeamWorkflow,
        tracer: Option<Arc<TracerSystem>>,
        sink: Option<TraceSink>,
    ) -> Self {
        Self {
            workflow,
            state: ConversationState::new(),
            tracer,
            sink,
        }
    }

    /// Wire up gateway, broker, tracer and trace sink from resolved configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gateway = Arc::new(OpenAIGateway::with_config(config.backend.clone())?);

        let (tracer, sink) = match config.tracing.settings() {
            Some(settings) => (
                Some(Arc::new(TracerSystem::default())),
                Some(TraceSink::new(settings.clone())?),
            ),
            None => (None, None),
        };

        let broker = LlmBroker::new(config.model.clone(), gateway, tracer.clone());
        let workflow = TeamWorkflow::new(broker, config.completion.clone(), tracer.clone());

        Ok(Self::new(workflow, tracer, sink))
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Run one turn
    ///
    /// The user message is appended first and stays even when the turn fails; the
    /// assistant message is appended only on success.
    pub async fn send(&mut self, input: &str) -> Result<TurnReply> {
        let correlation_id = Uuid::new_v4().to_string();
        let started_at = current_timestamp();

        self.state.begin_turn(input);
        let reply = match self.workflow.invoke(&self.state, &correlation_id).await {
            Ok(result) => self
                .state
                .complete_turn(result)
                .map(|(agent, response)| TurnReply {
                    agent,
                    response,
                    correlation_id: correlation_id.clone(),
                })
                .ok_or_else(|| {
                    TeamError::AgentError("workflow finished without a response".to_string())
                }),
            Err(e) => Err(e),
        };

        match &reply {
            Ok(turn) => info!(agent = %turn.agent, correlation_id = %correlation_id, "Turn complete"),
            Err(e) => warn!(error = %e, correlation_id = %correlation_id, "Turn failed"),
        }

        self.publish_trace(input, &correlation_id, started_at, &reply).await;
        reply
    }

    async fn publish_trace(
        &self,
        input: &str,
        correlation_id: &str,
        started_at: f64,
        reply: &Result<TurnReply>,
    ) {
        let (Some(sink), Some(tracer)) = (&self.sink, &self.tracer) else {
            return;
        };

        let records = tracer.records_for(correlation_id);
        let turn = RunSummary {
            name: TURN_RUN_NAME,
            correlation_id,
            input,
            agent: reply.as_ref().ok().map(|r| r.agent.label()),
            outcome: reply
                .as_ref()
                .map(|r| json!({ "output": r.response }))
                .map_err(|e| e.to_string()),
            started_at,
            finished_at: current_timestamp(),
        };

        if let Err(e) = sink.publish_run(&turn, &records).await {
            warn!(error = %e, correlation_id, "Failed to publish turn trace");
        }

        // Turns are sequential, so nothing else is waiting in the store
        tracer.clear();
    }
}
