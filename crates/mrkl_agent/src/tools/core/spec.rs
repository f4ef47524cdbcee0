use crate::types::ToolId;

/// Metadata describing a registered tool
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Key under which the tool is registered and routed to
    pub id: ToolId,
    /// Human readable name used in reasoning steps
    pub name: &'static str,
    /// What the tool does and what input it expects
    pub description: &'static str,
}
