pub mod core;
pub mod executor;
pub mod impls;

pub use self::core::{Render, Tool, ToolRegistry, ToolResult, ToolSpec};
pub use executor::ToolExecutor;
