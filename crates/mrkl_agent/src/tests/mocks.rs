use crate::composer::ResponseComposer;
use crate::tools::core::{Render, Tool, ToolRegistry, ToolResult, ToolSpec};
use crate::tools::impls::CalculatorTool;
use crate::types::ToolId;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize)]
pub struct MockOutput {
    pub text: String,
}

impl Render for MockOutput {
    fn status(&self) -> String {
        "Mock result".to_string()
    }

    fn render(&self) -> String {
        self.text.clone()
    }
}

impl ToolResult for MockOutput {
    fn is_success(&self) -> bool {
        true
    }
}

/// Tool with a canned reply that records every input it receives.
#[derive(Clone)]
pub struct MockTool {
    id: ToolId,
    name: &'static str,
    reply: Result<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTool {
    pub fn replying(id: ToolId, name: &'static str, reply: &str) -> Self {
        Self {
            id,
            name,
            reply: Ok(reply.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(id: ToolId, name: &'static str, message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            ..Self::replying(id, name, "")
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for MockTool {
    type Output = MockOutput;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            id: self.id,
            name: self.name,
            description: "Mock tool for tests",
        }
    }

    async fn execute(&self, input: &str) -> Result<Self::Output> {
        self.calls.lock().unwrap().push(input.to_string());
        match &self.reply {
            Ok(text) => Ok(MockOutput { text: text.clone() }),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

/// Real calculator plus mock weather, search and news tools.
pub struct MockTools {
    pub weather: MockTool,
    pub search: MockTool,
    pub news: MockTool,
}

impl MockTools {
    pub fn new() -> Self {
        Self {
            weather: MockTool::replying(
                ToolId::Weather,
                "weather",
                "Current weather in Tokyo: Clear sky, Temperature: 21.5°C, Humidity: 40%",
            ),
            search: MockTool::replying(
                ToolId::Search,
                "search",
                "Wikipedia: Artificial intelligence is the capability of computational systems to perform tasks associated with human intelligence.",
            ),
            news: MockTool::replying(
                ToolId::News,
                "news",
                "Latest news about AI:\n1. New model released\n   Source: Example Times",
            ),
        }
    }

    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CalculatorTool));
        registry.register(Box::new(self.weather.clone()));
        registry.register(Box::new(self.search.clone()));
        registry.register(Box::new(self.news.clone()));
        registry
    }

    pub fn total_calls(&self) -> usize {
        self.weather.calls().len() + self.search.calls().len() + self.news.calls().len()
    }
}

/// Composer that always answers with the same text.
pub struct FixedComposer(pub &'static str);

#[async_trait]
impl ResponseComposer for FixedComposer {
    async fn compose(&self, _query: &str, _tool_result: &str) -> String {
        self.0.to_string()
    }
}
