use crate::reflector::ValidationReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies the tool that handled a query. Exactly one per processed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolId {
    Calculator,
    Weather,
    Search,
    News,
    /// Query was rejected before routing.
    #[serde(rename = "input_validator")]
    InputValidator,
    /// Canned university events answer.
    #[serde(rename = "university_knowledge_base")]
    KnowledgeBase,
}

impl ToolId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Calculator => "calculator",
            ToolId::Weather => "weather",
            ToolId::Search => "search",
            ToolId::News => "news",
            ToolId::InputValidator => "input_validator",
            ToolId::KnowledgeBase => "university_knowledge_base",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step: String,
    pub content: String,
}

/// Ordered, append-only record of what the pipeline did for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasoningTrace {
    steps: Vec<ReasoningStep>,
}

impl ReasoningTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: impl Into<String>, content: impl Into<String>) {
        self.steps.push(ReasoningStep {
            step: step.into(),
            content: content.into(),
        });
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Case-insensitive search over every label and content.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.steps.iter().any(|s| {
            s.step.to_lowercase().contains(&needle) || s.content.to_lowercase().contains(&needle)
        })
    }
}

/// Everything produced for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    pub reasoning_steps: ReasoningTrace,
    pub tool_used: ToolId,
    pub parameters: String,
    pub validation: ValidationReport,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool {0} not found")]
    UnknownTool(ToolId),

    #[error("Tool {tool} failed: {message}")]
    Execution { tool: ToolId, message: String },
}
