use super::render::Render;
use super::result::ToolResult;
use super::spec::ToolSpec;
use anyhow::Result;
use serde::Serialize;

/// Core trait for tools, defining the execution interface
#[async_trait::async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Output type for this tool, must implement Render and ToolResult
    type Output: Render + ToolResult + Serialize + Send + Sync;

    /// Get the metadata for this tool
    fn spec(&self) -> ToolSpec;

    /// Execute the tool on the extracted parameter string.
    ///
    /// Expected failures (bad expression, service down) are reported inside
    /// `Output`; an `Err` is reserved for conditions the tool cannot describe
    /// itself.
    async fn execute(&self, input: &str) -> Result<Self::Output>;
}
