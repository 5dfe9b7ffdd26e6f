use crate::error::Result;
use crate::llm::tools::tool::required_string;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Canned facts answered without any network access: (keyword, country as written, capital)
const CAPITALS: [(&str, &str, &str); 5] = [
    ("netherlands", "the Netherlands", "Amsterdam"),
    ("australia", "Australia", "Canberra"),
    ("france", "France", "Paris"),
    ("japan", "Japan", "Tokyo"),
    ("brazil", "Brazil", "Brasília"),
];

/// Search the web for information about a query.
///
/// This is a mock: a handful of "capital of" questions have fixed answers, everything
/// else gets a placeholder that echoes the query.
pub fn search_web(query: &str) -> String {
    let lower = query.to_lowercase();

    if lower.contains("capital") {
        for (keyword, country, capital) in CAPITALS {
            if lower.contains(keyword) {
                return format!("The capital of {} is {}.", country, capital);
            }
        }
    }

    format!(
        "Found results for: {}. (This is a mock response - implement real search functionality as needed.)",
        query
    )
}

/// Exposes [`search_web`] to the model as the `search_web` tool
#[derive(Debug, Clone, Default)]
pub struct SearchWebTool;

impl LlmTool for SearchWebTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let query = required_string(args, "query")?;
        Ok(json!(search_web(query)))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::single_string_function(
            "search_web",
            "Search the web for information about a query.",
            "query",
            "The search query",
        )
    }

    fn clone_box(&self) -> Box<dyn LlmTool> {
        Box::new(self.clone())
    }
}
