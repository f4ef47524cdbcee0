//! Modular reasoning agent: validates a query, routes it to one tool,
//! composes the answer and checks it with a rule-based reflector.

pub mod agent;
pub mod calc;
pub mod cli;
pub mod composer;
pub mod config;
pub mod input_validator;
pub mod logging;
pub mod params;
pub mod reflector;
pub mod router;
pub mod settings;
pub mod tools;
pub mod types;

#[cfg(test)]
mod tests;

pub use agent::MrklAgent;
pub use config::AgentConfig;
pub use reflector::{Reflector, ValidationReport, ValidationSummary};
pub use router::{RouteDecision, ToolRouter};
pub use types::{AgentResponse, ReasoningStep, ReasoningTrace, ToolId};
