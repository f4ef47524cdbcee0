/// Trait for determining whether a tool execution was successful
pub trait ToolResult: Send + Sync + 'static {
    /// Returns false when the output only describes a failure (service
    /// unreachable, evaluation error, ...).
    fn is_success(&self) -> bool;
}
