use crate::error::Result;
use crate::llm::tools::arithmetic::{evaluate, format_number, ArithmeticError};
use crate::llm::tools::tool::required_string;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// A calculation the tool could not carry out
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error calculating {expression}: {source}")]
pub struct CalculationError {
    pub expression: String,
    #[source]
    pub source: ArithmeticError,
}

/// Calculate the result of an arithmetic expression.
///
/// Only numbers, `+ - * /` and parentheses are understood, so an expression coming
/// straight from a model can never execute anything.
pub fn calculate(expression: &str) -> std::result::Result<String, CalculationError> {
    evaluate(expression)
        .map(|value| format!("The result of {} is {}", expression, format_number(value)))
        .map_err(|source| CalculationError {
            expression: expression.to_string(),
            source,
        })
}

/// Exposes [`calculate`] to the model as the `calculate` tool
#[derive(Debug, Clone, Default)]
pub struct CalculatorTool;

impl LlmTool for CalculatorTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let expression = required_string(args, "expression")?;

        // The model gets the failure text as an observation and can retry
        let text = calculate(expression).unwrap_or_else(|e| {
            warn!(expression = expression, error = %e.source, "Calculation failed");
            e.to_string()
        });

        Ok(json!(text))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::single_string_function(
            "calculate",
            "Calculate the result of a mathematical expression.",
            "expression",
            "An arithmetic expression using numbers, + - * / and parentheses, e.g. '(3 + 4) * 2'",
        )
    }

    fn clone_box(&self) -> Box<dyn LlmTool> {
        Box::new(self.clone())
    }
}
