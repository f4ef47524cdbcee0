use crate::reflector::ValidationSummary;
use crate::types::{AgentResponse, ReasoningTrace};
use clap::{Parser, Subcommand};
use std::fmt::Write;

pub const DEMO_SCENARIOS: [&str; 4] = [
    "What's 15 * 23 + 100?",
    "What's the weather like in Tokyo?",
    "Tell me about artificial intelligence",
    "Calculate the area of a circle with radius 5",
];

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the predefined demo scenarios
    Demo,

    /// Answer a single query and exit
    Ask {
        /// The question to process
        query: String,

        /// Print the full response including the validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read queries from the terminal until `quit`
    Interactive,

    /// Run the demo scenarios and print the validation summary
    Summary,
}

/// Define the application arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Args {
    pub fn parse() -> Self {
        <Args as Parser>::parse()
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Demo)
    }
}

pub fn format_trace(trace: &ReasoningTrace) -> String {
    let mut out = String::new();
    for (i, step) in trace.steps().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}: {}", i + 1, step.step, step.content);
    }
    out
}

pub fn format_response(result: &AgentResponse) -> String {
    let validation = &result.validation;
    let mut out = String::new();
    let _ = writeln!(out, "Tool: {}", result.tool_used);
    let _ = writeln!(out, "Parameters: {}", result.parameters);
    let _ = writeln!(out, "Response: {}", result.response);
    let _ = writeln!(
        out,
        "Validation: {} ({}% confidence)",
        validation.validation_status, validation.confidence_level
    );
    let _ = writeln!(out, "  {}", validation.validation_reasoning);
    for suggestion in &validation.improvement_suggestions {
        let _ = writeln!(out, "  - {suggestion}");
    }
    out
}

pub fn format_summary(summary: Option<&ValidationSummary>) -> String {
    let Some(summary) = summary else {
        return "No validations performed yet\n".to_string();
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Validations: {} ({} retained)",
        summary.total_validations, summary.retained_validations
    );
    let _ = writeln!(out, "Accuracy: {:.1}%", summary.accuracy_rate);
    let _ = writeln!(out, "Average confidence: {:.1}%", summary.average_confidence);
    let _ = writeln!(
        out,
        "Recent: {}/{} correct, {:.1}% average confidence",
        summary.recent_correct, summary.recent_total, summary.recent_average_confidence
    );
    let _ = writeln!(out, "Latest: {}", summary.latest_validation);
    let _ = writeln!(out, "Trend: {}", summary.validation_trend);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflector::ValidationTrend;

    #[test]
    fn test_default_command_is_demo() {
        let args = Args::try_parse_from(["test"]).expect("Failed to parse default args");
        assert_eq!(args.verbose, 0);
        assert!(args.command.is_none());
        assert_eq!(args.command(), Command::Demo);
    }

    #[test]
    fn test_verbose_flag_counting() {
        let args = Args::try_parse_from(["test", "-vv"]).expect("Failed to parse verbose args");
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["test", "interactive", "-v", "-v", "-v"])
            .expect("Failed to parse verbose args");
        assert_eq!(args.verbose, 3);
        assert_eq!(args.command(), Command::Interactive);
    }

    #[test]
    fn test_ask_command() {
        let args = Args::try_parse_from(["test", "ask", "What is 2 + 2?", "--json"])
            .expect("Failed to parse ask args");
        match args.command() {
            Command::Ask { query, json } => {
                assert_eq!(query, "What is 2 + 2?");
                assert!(json);
            }
            other => panic!("Expected ask command, got {other:?}"),
        }

        assert!(Args::try_parse_from(["test", "ask"]).is_err());
    }

    #[test]
    fn test_format_trace() {
        let mut trace = ReasoningTrace::new();
        trace.record("Query Analysis", "Analyzing user query: 'hi'");
        trace.record("Tool Selection", "Search");
        assert_eq!(
            format_trace(&trace),
            "  1. Query Analysis: Analyzing user query: 'hi'\n  2. Tool Selection: Search\n"
        );
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(format_summary(None), "No validations performed yet\n");

        let summary = ValidationSummary {
            total_validations: 4,
            retained_validations: 4,
            accuracy_rate: 75.0,
            average_confidence: 80.5,
            recent_average_confidence: 80.5,
            recent_correct: 3,
            recent_total: 4,
            latest_validation: "2026-01-01 10:00:00".into(),
            validation_trend: ValidationTrend::Stable,
        };
        let text = format_summary(Some(&summary));
        assert!(text.contains("Accuracy: 75.0%"));
        assert!(text.contains("Recent: 3/4 correct"));
        assert!(text.ends_with("Trend: Stable\n"));
    }
}
