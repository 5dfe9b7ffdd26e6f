use crate::error::Result;
use crate::llm::tools::tool::required_string;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Get the current weather in a given location. Always sunny; no real data.
pub fn get_current_weather(location: &str) -> String {
    format!(
        "The weather in {} is currently sunny and 72 degrees. (This is a mock response - implement real weather API as needed.)",
        location
    )
}

/// Exposes [`get_current_weather`] to the model as the `get_current_weather` tool
#[derive(Debug, Clone, Default)]
pub struct CurrentWeatherTool;

impl LlmTool for CurrentWeatherTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let location = required_string(args, "location")?;
        Ok(json!(get_current_weather(location)))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::single_string_function(
            "get_current_weather",
            "Get the current weather in a given location.",
            "location",
            "City or place name, e.g. 'Tokyo'",
        )
    }

    fn clone_box(&self) -> Box<dyn LlmTool> {
        Box::new(self.clone())
    }
}
