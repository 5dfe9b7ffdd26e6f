//! The closed set of specialists the router can dispatch to.

use crate::llm::tools::{CalculatorTool, CurrentWeatherTool, LlmTool, SearchWebTool};
use serde::{Deserialize, Serialize};
use std::fmt;

const RESEARCH_PROMPT: &str = "You are the Research Agent, specialized in answering factual questions and providing accurate information. \
Use the search_web tool to find information when needed. Be concise but thorough in your responses, \
focusing on providing accurate and relevant information.";

const MATH_PROMPT: &str = "You are the Math Agent, specialized in solving mathematical problems and performing calculations. \
Use the calculate tool to solve mathematical expressions. Provide step-by-step explanations when appropriate.";

const WEATHER_PROMPT: &str = "You are the Weather Agent, specialized in providing weather information. \
Use the get_current_weather tool to retrieve weather data. Be specific about locations and conditions.";

const CONVERSATION_PROMPT: &str = "You are the Conversation Agent, specialized in friendly and engaging conversation. \
Handle greetings, personal questions, opinions, and general chit-chat. Be personable and conversational. \
When users introduce themselves, acknowledge them by name in your response.";

/// Category chosen by the router for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Research,
    Math,
    Weather,
    Conversation,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Research,
        AgentKind::Math,
        AgentKind::Weather,
        AgentKind::Conversation,
    ];

    /// Normalize a free-text router answer.
    ///
    /// First match wins in the order research, math, weather; anything else,
    /// including an empty answer, means conversation.
    pub fn from_router_answer(answer: &str) -> Self {
        let answer = answer.trim().to_lowercase();

        if answer.contains("research") {
            AgentKind::Research
        } else if answer.contains("math") {
            AgentKind::Math
        } else if answer.contains("weather") {
            AgentKind::Weather
        } else {
            AgentKind::Conversation
        }
    }

    /// Lower-case node name, also used as the tracer source
    pub fn label(&self) -> &'static str {
        match self {
            AgentKind::Research => "research",
            AgentKind::Math => "math",
            AgentKind::Weather => "weather",
            AgentKind::Conversation => "conversation",
        }
    }

    /// Human-facing name, e.g. "Math Agent"
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentKind::Research => "Research Agent",
            AgentKind::Math => "Math Agent",
            AgentKind::Weather => "Weather Agent",
            AgentKind::Conversation => "Conversation Agent",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AgentKind::Research => RESEARCH_PROMPT,
            AgentKind::Math => MATH_PROMPT,
            AgentKind::Weather => WEATHER_PROMPT,
            AgentKind::Conversation => CONVERSATION_PROMPT,
        }
    }

    /// Tools bound to this specialist; conversation has none
    pub fn tools(&self) -> Vec<Box<dyn LlmTool>> {
        match self {
            AgentKind::Research => vec![Box::new(SearchWebTool)],
            AgentKind::Math => vec![Box::new(CalculatorTool)],
            AgentKind::Weather => vec![Box::new(CurrentWeatherTool)],
            AgentKind::Conversation => vec![],
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_answers() {
        assert_eq!(AgentKind::from_router_answer("Research Agent"), AgentKind::Research);
        assert_eq!(AgentKind::from_router_answer("Math Agent"), AgentKind::Math);
        assert_eq!(AgentKind::from_router_answer("Weather Agent"), AgentKind::Weather);
        assert_eq!(
            AgentKind::from_router_answer("Conversation Agent"),
            AgentKind::Conversation
        );
    }

    #[test]
    fn test_case_and_whitespace_ignored() {
        assert_eq!(AgentKind::from_router_answer("  MATH\n"), AgentKind::Math);
        assert_eq!(AgentKind::from_router_answer("weather."), AgentKind::Weather);
    }

    #[test]
    fn test_priority_tie_break() {
        assert_eq!(AgentKind::from_router_answer("math and weather"), AgentKind::Math);
        assert_eq!(AgentKind::from_router_answer("weather or research"), AgentKind::Research);
    }

    #[test]
    fn test_unrecognized_falls_back_to_conversation() {
        assert_eq!(AgentKind::from_router_answer(""), AgentKind::Conversation);
        assert_eq!(AgentKind::from_router_answer("I'm not sure"), AgentKind::Conversation);
    }

    #[test]
    fn test_tool_binding() {
        let names = |kind: AgentKind| -> Vec<String> {
            kind.tools().iter().map(|t| t.descriptor().function.name).collect()
        };

        assert_eq!(names(AgentKind::Research), vec!["search_web"]);
        assert_eq!(names(AgentKind::Math), vec!["calculate"]);
        assert_eq!(names(AgentKind::Weather), vec!["get_current_weather"]);
        assert!(names(AgentKind::Conversation).is_empty());
    }

    #[test]
    fn test_labels_and_prompts() {
        for kind in AgentKind::ALL {
            assert!(kind.display_name().to_lowercase().starts_with(kind.label()));
            assert!(kind.system_prompt().contains(kind.display_name()));
        }
        assert_eq!(AgentKind::Math.to_string(), "math");
        assert_eq!(serde_json::to_string(&AgentKind::Weather).unwrap(), "\"weather\"");
    }
}
