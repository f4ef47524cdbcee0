//! Rule-based second opinion on an answer. Needs no network access.

use super::answer::contains_any;
use super::report::{AiDecision, AiValidation};
use crate::types::ReasoningTrace;

pub const MODEL_NAME: &str = "Rule-Based Validator";

const MATH_MARKERS: &[&str] = &["calculate", "math", "+", "-", "*", "/"];
const WEATHER_MARKERS: &[&str] = &["weather", "temperature", "climate"];
const WEATHER_VOCABULARY: &[&str] = &[
    "temperature",
    "degrees",
    "weather",
    "sunny",
    "cloudy",
    "rain",
    "celsius",
    "fahrenheit",
];
const INFORMATIONAL_MARKERS: &[&str] = &[
    "what", "who", "where", "when", "why", "how", "explain", "define",
];
const TOOL_NAMES: &[&str] = &["calculator", "weather", "search", "news"];

pub fn assess(query: &str, response: &str, trace: &ReasoningTrace) -> AiValidation {
    let query = query.to_lowercase();
    let lowered = response.to_lowercase();
    let length = response.chars().count();

    let mut issues: Vec<&str> = Vec::new();
    let mut positives: Vec<&str> = Vec::new();

    let mut confidence: i32 = if contains_any(&query, MATH_MARKERS) {
        if response.chars().any(|c| c.is_ascii_digit()) {
            positives.push("Contains numerical result for math query");
            85
        } else {
            issues.push("Mathematical query missing numerical answer");
            30
        }
    } else if contains_any(&query, WEATHER_MARKERS) {
        if contains_any(&lowered, WEATHER_VOCABULARY) {
            positives.push("Contains weather-related information");
            80
        } else {
            issues.push("Weather query lacks weather information");
            40
        }
    } else if contains_any(&query, INFORMATIONAL_MARKERS) {
        if length > 20 {
            positives.push("Provides substantial informational content");
            75
        } else {
            issues.push("Informational query has very brief response");
            50
        }
    } else {
        positives.push("Response addresses the query appropriately");
        70
    };

    if length > 100 {
        positives.push("Detailed response provided");
    } else if length < 10 {
        issues.push("Response appears too brief");
        confidence -= 20;
    }

    if TOOL_NAMES.iter().any(|tool| trace.mentions(tool)) {
        positives.push("Appropriate tool usage detected in reasoning");
        confidence += 5;
    }

    let (ai_decision, ai_reasoning, confidence) =
        if !issues.is_empty() && issues.len() >= positives.len() {
            (
                AiDecision::Incorrect,
                format!("Issues identified: {}", issues.join(", ")),
                (confidence - 20).max(20),
            )
        } else {
            (
                AiDecision::Correct,
                format!("Validation passed: {}", positives.join(", ")),
                (confidence + 10).min(90),
            )
        };

    AiValidation {
        ai_confidence: confidence.clamp(0, 100) as u8,
        ai_decision,
        ai_reasoning,
        model_used: MODEL_NAME.to_string(),
        validation_successful: true,
    }
}
