//! Adapter for converting LLM messages to and from the OpenAI wire format.

use crate::error::Result;
use crate::llm::models::{LlmMessage, LlmToolCall, MessageRole, TokenUsage};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

/// Adapt LLM messages to OpenAI format.
pub fn adapt_messages_to_openai(messages: &[LlmMessage]) -> Result<Vec<Value>> {
    let mut result = Vec::with_capacity(messages.len());

    for msg in messages {
        let openai_msg = match msg.role {
            MessageRole::System => json!({
                "role": "system",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::User => json!({
                "role": "user",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::Assistant => {
                let mut assistant_msg = json!({ "role": "assistant" });

                if let Some(ref content) = msg.content {
                    assistant_msg["content"] = json!(content);
                }

                if let Some(ref tool_calls) = msg.tool_calls {
                    let formatted_calls = tool_calls
                        .iter()
                        .map(|tc| {
                            let arguments = match tc.malformed_arguments {
                                Some(ref raw) => raw.clone(),
                                None => serde_json::to_string(&tc.arguments)?,
                            };
                            Ok(json!({
                                "id": tc.id.as_deref().unwrap_or(""),
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": arguments
                                }
                            }))
                        })
                        .collect::<Result<Vec<Value>>>()?;
                    assistant_msg["tool_calls"] = json!(formatted_calls);
                }

                assistant_msg
            }
            MessageRole::Tool => {
                // Tool messages answer the first tool call they carry
                let tool_call_id = msg
                    .tool_calls
                    .as_ref()
                    .and_then(|tcs| tcs.first())
                    .and_then(|tc| tc.id.clone())
                    .unwrap_or_default();

                json!({
                    "role": "tool",
                    "content": msg.content.as_deref().unwrap_or(""),
                    "tool_call_id": tool_call_id
                })
            }
        };

        result.push(openai_msg);
    }

    Ok(result)
}

/// Convert tool calls from OpenAI format to internal format.
///
/// Calls whose argument text is not a JSON object are kept, with the raw text in
/// `malformed_arguments`, so the broker can tell the model what went wrong.
pub fn convert_tool_calls(tool_calls: &[Value]) -> Vec<LlmToolCall> {
    tool_calls
        .iter()
        .filter_map(|tc| {
            let id = tc["id"].as_str().map(String::from);
            let name = tc["function"]["name"].as_str()?.to_string();
            let (arguments, malformed_arguments) = parse_arguments(&tc["function"]["arguments"]);

            if let Some(ref raw) = malformed_arguments {
                warn!(tool = %name, arguments = %raw, "Tool call arguments are not a JSON object");
            }

            Some(LlmToolCall {
                id,
                name,
                arguments,
                malformed_arguments,
            })
        })
        .collect()
}

fn parse_arguments(raw: &Value) -> (HashMap<String, Value>, Option<String>) {
    match raw {
        Value::Null => (HashMap::new(), None),
        // Some servers send the object itself instead of a string
        Value::Object(map) => (map.clone().into_iter().collect(), None),
        Value::String(text) if text.trim().is_empty() => (HashMap::new(), None),
        Value::String(text) => match serde_json::from_str::<HashMap<String, Value>>(text) {
            Ok(arguments) => (arguments, None),
            Err(_) => (HashMap::new(), Some(text.clone())),
        },
        other => (HashMap::new(), Some(other.to_string())),
    }
}

/// Read the `usage` block of a completion response, if any
pub fn convert_usage(usage: &Value) -> Option<TokenUsage> {
    if !usage.is_object() {
        return None;
    }

    Some(TokenUsage {
        prompt_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
        total_tokens: usage["total_tokens"].as_u64().unwrap_or(0),
    })
}
