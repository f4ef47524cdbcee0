use super::render::Render;
use super::result::ToolResult;
use super::spec::ToolSpec;
use super::tool::Tool;
use anyhow::Result;
use serde::Serialize;

/// Type-erased tool output that can be rendered and determined for success
pub trait AnyOutput: Send + Sync {
    /// Get a reference to the output as a Render trait object
    fn as_render(&self) -> &dyn Render;

    /// Determine if the tool execution was successful
    fn is_success(&self) -> bool;

    /// Serialize this output to a JSON value
    fn to_json(&self) -> Result<serde_json::Value>;
}

/// Automatically implemented for all types that implement both Render, ToolResult and Serialize
impl<T: Render + ToolResult + Serialize + Send + Sync + 'static> AnyOutput for T {
    fn as_render(&self) -> &dyn Render {
        self
    }

    fn is_success(&self) -> bool {
        ToolResult::is_success(self)
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| anyhow::anyhow!("Failed to serialize output: {}", e))
    }
}

/// Type-erased tool interface for storing heterogeneous tools in collections
#[async_trait::async_trait]
pub trait DynTool: Send + Sync + 'static {
    /// Get the static metadata for this tool
    fn spec(&self) -> ToolSpec;

    /// Invoke the tool and get a type-erased output
    async fn invoke(&self, input: &str) -> Result<Box<dyn AnyOutput>>;
}

/// Automatic implementation of DynTool for any type that implements Tool
#[async_trait::async_trait]
impl<T> DynTool for T
where
    T: Tool,
    T::Output: Render + ToolResult + Serialize + Send + Sync + 'static,
{
    fn spec(&self) -> ToolSpec {
        Tool::spec(self)
    }

    async fn invoke(&self, input: &str) -> Result<Box<dyn AnyOutput>> {
        let output = self.execute(input).await?;
        Ok(Box::new(output) as Box<dyn AnyOutput>)
    }
}
