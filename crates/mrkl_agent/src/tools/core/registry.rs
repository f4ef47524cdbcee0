use std::collections::HashMap;

use crate::config::AgentConfig;
use crate::tools::core::dyn_tool::DynTool;
use crate::types::ToolId;

/// Lookup table of the tools available to one agent
pub struct ToolRegistry {
    tools: HashMap<ToolId, Box<dyn DynTool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry with the calculator, weather, search and news tools wired to
    /// the configured services
    pub fn with_default_tools(config: &AgentConfig) -> Self {
        use crate::tools::impls::{CalculatorTool, NewsTool, SearchTool, WeatherTool};

        let mut registry = Self::new();
        registry.register(Box::new(CalculatorTool));
        registry.register(Box::new(WeatherTool::from_config(config)));
        registry.register(Box::new(SearchTool::from_config(config)));
        registry.register(Box::new(NewsTool::from_config(config)));
        registry
    }

    /// Register a tool under the id from its spec, replacing any previous one
    pub fn register(&mut self, tool: Box<dyn DynTool>) {
        self.tools.insert(tool.spec().id, tool);
    }

    pub fn get(&self, id: ToolId) -> Option<&dyn DynTool> {
        self.tools.get(&id).map(|tool| tool.as_ref())
    }

    pub fn contains(&self, id: ToolId) -> bool {
        self.tools.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
