//! Two-stage workflow graph: router, then exactly one specialist.

use crate::agents::{AgentKind, RouterAgent, SpecialistAgent};
use crate::error::{Result, TeamError};
use crate::llm::{CompletionConfig, LlmBroker};
use crate::team::state::ConversationState;
use crate::tracer::TracerSystem;
use std::sync::Arc;
use tracing::{debug, info};

/// Position in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Router,
    Specialist(AgentKind),
    Done,
}

/// The compiled team: a router and one specialist per [`AgentKind`]
pub struct TeamWorkflow {
    router: RouterAgent,
    research: SpecialistAgent,
    math: SpecialistAgent,
    weather: SpecialistAgent,
    conversation: SpecialistAgent,
    tracer: Option<Arc<TracerSystem>>,
}

impl TeamWorkflow {
    /// Build every node from one broker and tracer
    pub fn new(broker: LlmBroker, config: CompletionConfig, tracer: Option<Arc<TracerSystem>>) -> Self {
        let specialist =
            |kind: AgentKind| SpecialistAgent::new(kind, broker.clone(), config.clone());

        Self {
            research: specialist(AgentKind::Research),
            math: specialist(AgentKind::Math),
            weather: specialist(AgentKind::Weather),
            conversation: specialist(AgentKind::Conversation),
            router: RouterAgent::new(broker.clone(), config.clone()),
            tracer,
        }
    }

    fn specialist(&self, kind: AgentKind) -> &SpecialistAgent {
        match kind {
            AgentKind::Research => &self.research,
            AgentKind::Math => &self.math,
            AgentKind::Weather => &self.weather,
            AgentKind::Conversation => &self.conversation,
        }
    }

    /// Run one turn over a snapshot of the state and return the updated copy
    ///
    /// `state.user_input` must hold the utterance of the turn. The input state is
    /// never modified.
    pub async fn invoke(
        &self,
        state: &ConversationState,
        correlation_id: &str,
    ) -> Result<ConversationState> {
        let user_input = state
            .user_input
            .clone()
            .filter(|input| !input.trim().is_empty())
            .ok_or_else(|| TeamError::AgentError("no user input to route".to_string()))?;

        let mut next = state.clone();
        let mut node = Node::Router;

        loop {
            debug!(?node, correlation_id, "Workflow step");
            node = match node {
                Node::Router => {
                    let kind = self.router_step(&user_input, correlation_id).await?;
                    next.current_agent = Some(kind);
                    Node::Specialist(kind)
                }
                Node::Specialist(kind) => {
                    let response = self
                        .specialist(kind)
                        .respond(&user_input, &next.messages, correlation_id)
                        .await?;
                    next.final_response = Some(response);
                    Node::Done
                }
                Node::Done => return Ok(next),
            };
        }
    }

    async fn router_step(&self, user_input: &str, correlation_id: &str) -> Result<AgentKind> {
        let kind = self.router.route(user_input, correlation_id).await?;
        info!(agent = %kind, correlation_id, "Dispatching to specialist");

        if let Some(tracer) = &self.tracer {
            tracer.record_agent_interaction(
                "router",
                kind.label(),
                "dispatch",
                None,
                "workflow",
                correlation_id,
            );
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gateway::{ContentStream, LlmGateway};
    use crate::llm::models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole};
    use crate::llm::tools::LlmTool;
    use crate::tracer::TracerRecord;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers the router with `route`, then plays `script` for the specialist
    struct TeamGateway {
        route: String,
        script: Mutex<Vec<LlmGatewayResponse>>,
        tool_offers: Mutex<Vec<usize>>,
    }

    impl TeamGateway {
        fn new(route: &str, script: Vec<LlmGatewayResponse>) -> Arc<Self> {
            Arc::new(Self {
                route: route.to_string(),
                script: Mutex::new(script),
                tool_offers: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmGateway for TeamGateway {
        async fn complete(
            &self,
            _model: &str,
            messages: &[LlmMessage],
            tools: Option<&[Box<dyn LlmTool>]>,
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            let is_router = messages
                .first()
                .and_then(|m| m.content.as_deref())
                .is_some_and(|c| c.starts_with("You are the Router Agent"));
            if is_router {
                return Ok(LlmGatewayResponse::text(self.route.clone()));
            }

            self.tool_offers.lock().unwrap().push(tools.map_or(0, |t| t.len()));
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                Ok(LlmGatewayResponse::text("fallback"))
            } else {
                Ok(script.remove(0))
            }
        }

        async fn get_available_models(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }

        fn complete_stream<'a>(
            &'a self,
            _model: &'a str,
            _messages: &'a [LlmMessage],
            _config: &'a CompletionConfig,
        ) -> ContentStream<'a> {
            Box::pin(futures::stream::empty())
        }
    }

    fn workflow(gateway: Arc<TeamGateway>, tracer: Option<Arc<TracerSystem>>) -> TeamWorkflow {
        let broker = LlmBroker::new("local-model", gateway, tracer.clone());
        TeamWorkflow::new(broker, CompletionConfig::default(), tracer)
    }

    fn state_with(input: &str) -> ConversationState {
        let mut state = ConversationState::new();
        state.begin_turn(input);
        state
    }

    #[tokio::test]
    async fn test_math_turn_runs_calculator() {
        let gateway = TeamGateway::new(
            "Math Agent",
            vec![
                LlmGatewayResponse {
                    content: None,
                    tool_calls: vec![LlmToolCall {
                        id: Some("call_1".to_string()),
                        name: "calculate".to_string(),
                        arguments: HashMap::from([("expression".to_string(), json!("15 * 7"))]),
                        malformed_arguments: None,
                    }],
                    usage: None,
                },
                LlmGatewayResponse::text("15 * 7 = 105"),
            ],
        );
        let state = state_with("What is 15 * 7?");

        let result = workflow(gateway.clone(), None).invoke(&state, "c1").await.unwrap();

        assert_eq!(result.current_agent, Some(AgentKind::Math));
        assert_eq!(result.final_response.as_deref(), Some("15 * 7 = 105"));
        assert_eq!(*gateway.tool_offers.lock().unwrap(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_conversation_turn_has_no_tools() {
        let gateway = TeamGateway::new(
            "Conversation Agent",
            vec![LlmGatewayResponse::text("Hi Mark, how can I help you today?")],
        );
        let state = state_with("I am Mark");

        let result = workflow(gateway.clone(), None).invoke(&state, "c1").await.unwrap();

        assert_eq!(result.current_agent, Some(AgentKind::Conversation));
        assert!(result.final_response.unwrap_or_default().contains("Mark"));
        assert_eq!(*gateway.tool_offers.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_unrecognized_route_falls_back_to_conversation() {
        let gateway = TeamGateway::new(
            "I'm not sure which agent should handle this.",
            vec![LlmGatewayResponse::text("Nice to meet you, Mark!")],
        );
        let state = state_with("I am Mark");

        let result = workflow(gateway.clone(), None).invoke(&state, "c1").await.unwrap();

        assert_eq!(result.current_agent, Some(AgentKind::Conversation));
        assert_eq!(result.final_response.as_deref(), Some("Nice to meet you, Mark!"));
        assert_eq!(*gateway.tool_offers.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_invoke_does_not_touch_input_state() {
        let gateway = TeamGateway::new("Weather Agent", vec![LlmGatewayResponse::text("Sunny.")]);
        let state = state_with("Weather in Paris?");
        let before = state.clone();

        let result = workflow(gateway, None).invoke(&state, "c1").await.unwrap();

        assert_eq!(state, before);
        assert_eq!(result.messages, before.messages);
        assert_eq!(result.current_agent, Some(AgentKind::Weather));
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let gateway = TeamGateway::new("Math Agent", vec![]);
        let state = ConversationState::new();

        let result = workflow(gateway, None).invoke(&state, "c1").await;
        assert!(matches!(result, Err(TeamError::AgentError(_))));
    }

    #[tokio::test]
    async fn test_dispatch_traced_with_correlation_id() {
        let tracer = Arc::new(TracerSystem::default());
        let gateway = TeamGateway::new("Research Agent", vec![LlmGatewayResponse::text("Paris.")]);
        let state = state_with("Capital of France?");

        workflow(gateway, Some(tracer.clone()))
            .invoke(&state, "turn-7")
            .await
            .unwrap();

        let records = tracer.records_for("turn-7");
        assert_eq!(records.len(), tracer.len());

        let dispatches: Vec<_> = records
            .iter()
            .filter_map(|r| match r {
                TracerRecord::AgentInteraction(e) => Some((e.from_agent.clone(), e.to_agent.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(dispatches, vec![("router".to_string(), "research".to_string())]);

        let specialist_call = records.iter().find_map(|r| match r {
            TracerRecord::LlmCall(e) if e.source == "research" => Some(e),
            _ => None,
        });
        let messages = &specialist_call.unwrap().messages;
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages.len(), 2);
    }
}
