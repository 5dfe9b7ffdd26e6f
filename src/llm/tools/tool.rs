use crate::error::{Result, TeamError};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Descriptor for tool function parameters
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Describe a function taking a single required string parameter
    pub fn single_string_function(
        name: &str,
        description: &str,
        parameter: &str,
        parameter_description: &str,
    ) -> Self {
        Self {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        parameter: {
                            "type": "string",
                            "description": parameter_description
                        }
                    },
                    "required": [parameter]
                }),
            },
        }
    }
}

/// Trait for LLM tools
pub trait LlmTool: Send + Sync {
    /// Execute the tool with given arguments
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value>;

    /// Get tool descriptor for LLM
    fn descriptor(&self) -> ToolDescriptor;

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.descriptor().function.name == name
    }

    /// Clone the tool into a Box
    fn clone_box(&self) -> Box<dyn LlmTool>;
}

impl Clone for Box<dyn LlmTool> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Pull a required string argument out of a tool call's arguments
pub(crate) fn required_string<'a>(args: &'a HashMap<String, Value>, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| TeamError::ToolError(format!("Missing required argument: {}", name)))
}
