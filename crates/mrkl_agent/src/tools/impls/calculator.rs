use crate::calc::{self, Number};
use crate::tools::core::{Render, Tool, ToolResult, ToolSpec};
use crate::types::ToolId;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalculatorOutput {
    Evaluated { expression: String, result: Number },
    InvalidCharacters { expression: String },
    Failed { expression: String, reason: String },
}

impl Render for CalculatorOutput {
    fn status(&self) -> String {
        match self {
            CalculatorOutput::Evaluated { result, .. } => format!("Calculated {result}"),
            CalculatorOutput::InvalidCharacters { .. } => "Rejected expression".to_string(),
            CalculatorOutput::Failed { reason, .. } => format!("Calculation failed: {reason}"),
        }
    }

    fn render(&self) -> String {
        match self {
            CalculatorOutput::Evaluated { expression, result } => {
                format!("Calculation: {expression} = {result}")
            }
            CalculatorOutput::InvalidCharacters { .. } => {
                "Error: Invalid characters in expression".to_string()
            }
            CalculatorOutput::Failed { expression, reason } => {
                format!("Error calculating {expression}: {reason}")
            }
        }
    }
}

impl ToolResult for CalculatorOutput {
    fn is_success(&self) -> bool {
        matches!(self, CalculatorOutput::Evaluated { .. })
    }
}

pub struct CalculatorTool;

#[async_trait::async_trait]
impl Tool for CalculatorTool {
    type Output = CalculatorOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            id: ToolId::Calculator,
            name: "calculator",
            description: "Useful for performing mathematical calculations. Input should be a mathematical expression like '2+2' or '3.14*5^2'",
        }
    }

    async fn execute(&self, input: &str) -> Result<Self::Output> {
        let expression = input.to_string();
        let normalized = calc::normalize(input);
        if !calc::has_only_allowed_chars(&normalized) {
            info!("Calculator rejected {input:?}");
            return Ok(CalculatorOutput::InvalidCharacters { expression });
        }

        Ok(match calc::evaluate(&normalized) {
            Ok(result) => CalculatorOutput::Evaluated { expression, result },
            Err(e) => CalculatorOutput::Failed {
                expression,
                reason: e.to_string(),
            },
        })
    }
}

impl CalculatorOutput {
    pub fn result(&self) -> Option<Number> {
        match self {
            CalculatorOutput::Evaluated { result, .. } => Some(*result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &str) -> CalculatorOutput {
        CalculatorTool.execute(input).await.unwrap()
    }

    #[tokio::test]
    async fn test_calculation_output() {
        let output = run("15 * 23 + 100").await;
        assert!(output.is_success());
        assert_eq!(output.result(), Some(Number::Int(445)));
        assert_eq!(output.render(), "Calculation: 15 * 23 + 100 = 445");
    }

    #[tokio::test]
    async fn test_keeps_original_notation() {
        assert_eq!(run("2^8").await.render(), "Calculation: 2^8 = 256");
        assert_eq!(run("10 / 4").await.render(), "Calculation: 10 / 4 = 2.5");
        assert_eq!(run("8 / 2").await.render(), "Calculation: 8 / 2 = 4.0");
    }

    #[tokio::test]
    async fn test_invalid_characters() {
        let output = run("__import__('os')").await;
        assert!(!output.is_success());
        assert_eq!(output.render(), "Error: Invalid characters in expression");
    }

    #[tokio::test]
    async fn test_evaluation_error() {
        let output = run("5 / 0").await;
        assert!(!output.is_success());
        assert_eq!(output.render(), "Error calculating 5 / 0: division by zero");
    }

    #[test]
    fn test_output_serialization() {
        let output = CalculatorOutput::Evaluated {
            expression: "1 + 1".into(),
            result: Number::Int(2),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "evaluated");
        assert_eq!(json["result"], 2);
    }
}
