use super::report::{ReasoningQuality, ReasoningValidation};
use crate::types::ReasoningTrace;

const CRITICAL_STEPS: [&str; 3] = ["Query Analysis", "Tool Selection", "Tool Execution"];

/// Scores how complete the recorded reasoning is.
pub fn validate_chain(trace: &ReasoningTrace) -> ReasoningValidation {
    let labels: Vec<String> = trace.steps().iter().map(|s| s.step.to_lowercase()).collect();

    let missing_steps: Vec<String> = CRITICAL_STEPS
        .iter()
        .filter(|critical| {
            let critical = critical.to_lowercase();
            !labels.iter().any(|label| label.contains(&critical))
        })
        .map(|s| s.to_string())
        .collect();

    let step_issues: Vec<String> = trace
        .steps()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.content.chars().count() < 5)
        .map(|(i, s)| format!("Step {} ({}): Very minimal content", i + 1, s.step))
        .collect();

    let present = CRITICAL_STEPS.len() - missing_steps.len();
    let mut ratio = present as f64 / CRITICAL_STEPS.len() as f64;
    if trace.len() >= 3 {
        ratio = ratio.max(0.8);
    }
    let completeness_score = (ratio * 100.0) as u8;

    let (reasoning_quality, logical_consistency) = match completeness_score {
        s if s >= 80 && step_issues.is_empty() => (ReasoningQuality::Excellent, true),
        s if s >= 60 => (ReasoningQuality::Good, true),
        s if s >= 40 => (ReasoningQuality::Acceptable, true),
        _ => (ReasoningQuality::Poor, false),
    };

    ReasoningValidation {
        step_count: trace.len(),
        logical_consistency,
        completeness_score,
        step_issues,
        missing_steps,
        reasoning_quality,
    }
}
