use crate::tools::core::ToolRegistry;
use crate::types::{ReasoningTrace, ToolError, ToolId};
use tracing::{debug, info, warn};

/// Runs a registered tool and records the execution in the reasoning trace.
///
/// Never fails: an unknown tool or a tool error is turned into a result text
/// that flows through the rest of the pipeline like any other answer.
pub struct ToolExecutor<'a> {
    registry: &'a ToolRegistry,
}

impl<'a> ToolExecutor<'a> {
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, tool: ToolId, parameters: &str, trace: &mut ReasoningTrace) -> String {
        let Some(handler) = self.registry.get(tool) else {
            let error = ToolError::UnknownTool(tool);
            warn!("{error}");
            return error.to_string();
        };

        let spec = handler.spec();
        trace.record(
            "Tool Execution",
            format!("Executing {} with parameters: {parameters}", spec.name),
        );

        let result = match handler.invoke(parameters).await {
            Ok(output) => {
                info!(
                    "{} finished: {} (success: {})",
                    spec.name,
                    output.as_render().status(),
                    output.is_success()
                );
                if let Ok(json) = output.to_json() {
                    debug!("{} output: {json}", spec.name);
                }
                output.as_render().render()
            }
            Err(e) => {
                let error = ToolError::Execution {
                    tool,
                    message: e.to_string(),
                };
                warn!("{error}");
                error.to_string()
            }
        };

        trace.record("Result", result.clone());
        result
    }
}
