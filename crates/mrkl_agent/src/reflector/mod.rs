//! Post-hoc validation of agent answers.
//!
//! Every answer is classified, arithmetic is re-evaluated independently, the
//! reasoning trace is scored and a rule-based second opinion is combined
//! into a [`ValidationReport`]. Reports are kept in a bounded history.

mod answer;
mod decision;
mod heuristic;
mod history;
mod math;
mod reasoning;
mod report;

pub use answer::analyze_answer;
pub use decision::{decide, Decision};
pub use heuristic::assess;
pub use history::{ValidationHistory, ValidationSummary, ValidationTrend};
pub use math::{extract_expression, extract_result, validate_math};
pub use reasoning::validate_chain;
pub use report::*;

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::types::ReasoningTrace;
use tracing::{debug, info};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Reflector {
    history: ValidationHistory,
}

impl Reflector {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: ValidationHistory::new(history_capacity),
        }
    }

    /// Validates one answer and appends the report to the history.
    pub fn validate(
        &mut self,
        query: &str,
        response: &str,
        trace: &ReasoningTrace,
    ) -> ValidationReport {
        let answer_analysis = analyze_answer(query, response);
        let reasoning_validation = validate_chain(trace);
        let ai_validation = assess(query, response, trace);
        let decision = decide(&answer_analysis, &reasoning_validation, &ai_validation);

        debug!(
            "Validated {:?} answer: correct={} confidence={}",
            answer_analysis.answer_type, decision.is_correct, decision.confidence
        );

        let report = ValidationReport {
            timestamp: timestamp(),
            original_query: query.to_string(),
            mrkl_response: response.to_string(),
            validation_decision: decision.is_correct,
            confidence_level: decision.confidence,
            validation_reasoning: decision.reasoning,
            answer_analysis,
            reasoning_validation,
            ai_validation,
            improvement_suggestions: decision.suggestions,
            validation_status: ValidationStatus::from_decision(decision.is_correct),
        };
        self.history.push(report.clone());
        report
    }

    /// Report for input rejected before any tool ran. Handling it with
    /// guidance counts as a correct answer.
    pub fn record_rejection(
        &mut self,
        query: &str,
        response: &str,
        trace: &ReasoningTrace,
    ) -> ValidationReport {
        info!("Recording rejected input {query:?}");

        let mut answer_analysis =
            AnswerAnalysis::new(AnswerType::ErrorHandling, response.chars().count());
        answer_analysis.specific_patterns = vec![
            "Input validation error".to_string(),
            "Helpful guidance provided".to_string(),
        ];

        let report = ValidationReport {
            timestamp: timestamp(),
            original_query: query.to_string(),
            mrkl_response: response.to_string(),
            validation_decision: true,
            confidence_level: 95,
            validation_reasoning:
                "Correctly identified and handled meaningless input with helpful guidance"
                    .to_string(),
            answer_analysis,
            reasoning_validation: validate_chain(trace),
            ai_validation: AiValidation {
                ai_confidence: 95,
                ai_decision: AiDecision::Correct,
                ai_reasoning: "Input rejected before tool selection".to_string(),
                model_used: heuristic::MODEL_NAME.to_string(),
                validation_successful: true,
            },
            improvement_suggestions: Vec::new(),
            validation_status: ValidationStatus::Correct,
        };
        self.history.push(report.clone());
        report
    }

    pub fn history(&self) -> &ValidationHistory {
        &self.history
    }

    pub fn summary(&self) -> Option<ValidationSummary> {
        self.history.summary()
    }
}

impl Default for Reflector {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator_trace(query: &str, result: &str) -> ReasoningTrace {
        let mut trace = ReasoningTrace::new();
        trace.record("Query Analysis", format!("Analyzing user query: '{query}'"));
        trace.record(
            "Tool Selection",
            "Detected mathematical expression - selecting Calculator tool",
        );
        trace.record("Parameter Extraction", "Extracted parameters: 2+2");
        trace.record("Tool Execution", "Executing Calculator with parameters: 2+2");
        trace.record("Result", result);
        trace
    }

    #[test]
    fn test_correct_calculation() {
        let mut reflector = Reflector::new(10);
        let trace = calculator_trace("What's 15 * 23 + 100?", "Calculation: 15 * 23 + 100 = 445");
        let report = reflector.validate(
            "What's 15 * 23 + 100?",
            "Calculation: 15 * 23 + 100 = 445",
            &trace,
        );
        assert!(report.validation_decision);
        assert_eq!(report.validation_status, ValidationStatus::Correct);
        assert!(report.confidence_level >= 85);
        assert!(report.validation_reasoning.starts_with("ANSWER VALIDATED: "));
        assert_eq!(reflector.history().len(), 1);
    }

    #[test]
    fn test_wrong_calculation() {
        let mut reflector = Reflector::default();
        let trace = calculator_trace("calculate 2+2", "Calculation: 2+2 = 5");
        let report = reflector.validate("calculate 2+2", "Calculation: 2+2 = 5", &trace);
        assert!(!report.validation_decision);
        assert_eq!(report.validation_status, ValidationStatus::Incorrect);
        assert!(report.confidence_level <= 30);
        assert!(report
            .improvement_suggestions
            .iter()
            .any(|s| s.contains("Expected 4, got 5")));
    }

    #[test]
    fn test_rejection_report() {
        let mut reflector = Reflector::new(10);
        let mut trace = ReasoningTrace::new();
        trace.record("Query Analysis", "Analyzing user query: 'qwxzvbn'");
        trace.record(
            "Input Validation",
            "Detected meaningless or random input - cannot process",
        );
        let report = reflector.record_rejection("qwxzvbn", "Please ask a clear question", &trace);

        assert!(report.validation_decision);
        assert_eq!(report.confidence_level, 95);
        assert_eq!(report.answer_analysis.answer_type, AnswerType::ErrorHandling);
        assert_eq!(
            report.validation_reasoning,
            "Correctly identified and handled meaningless input with helpful guidance"
        );
        assert_eq!(reflector.summary().map(|s| s.total_validations), Some(1));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut reflector = Reflector::new(10);
        let trace = calculator_trace("calculate 2+2", "Calculation: 2+2 = 4");
        let first = reflector.validate("calculate 2+2", "Calculation: 2+2 = 4", &trace);
        let second = reflector.validate("calculate 2+2", "Calculation: 2+2 = 4", &trace);
        assert_eq!(first.validation_decision, second.validation_decision);
        assert_eq!(first.confidence_level, second.confidence_level);
        assert_eq!(first.validation_reasoning, second.validation_reasoning);
        assert_eq!(first.improvement_suggestions, second.improvement_suggestions);
    }

    #[test]
    fn test_report_serializes() {
        let mut reflector = Reflector::new(1);
        let report = reflector.validate("weather in Paris", "Sunny, 20 degrees", &ReasoningTrace::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["answer_analysis"]["answer_type"], "weather");
        assert_eq!(json["validation_status"], report.validation_status.to_string());
    }
}
