use super::math::validate_math;
use super::report::{AnswerAnalysis, AnswerType, MathStatus};

const MATH_MARKERS: &[&str] = &["calculate", "math", "+", "-", "*", "/", "="];
const WEATHER_MARKERS: &[&str] = &["weather", "temperature", "climate"];
const WEATHER_VOCABULARY: &[&str] = &["temperature", "degrees", "weather", "sunny", "cloudy", "rain"];
const QUESTION_WORDS: &[&str] = &["what", "who", "where", "when", "why", "how"];

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

pub(crate) fn classify(query: &str) -> AnswerType {
    let query = query.to_lowercase();
    if contains_any(&query, MATH_MARKERS) {
        AnswerType::Mathematical
    } else if contains_any(&query, WEATHER_MARKERS) {
        AnswerType::Weather
    } else if contains_any(&query, QUESTION_WORDS) {
        AnswerType::Informational
    } else {
        AnswerType::Unknown
    }
}

/// Classifies the query and checks the response carries the content that
/// kind of question calls for.
pub fn analyze_answer(query: &str, response: &str) -> AnswerAnalysis {
    let length = response.chars().count();
    let mut analysis = AnswerAnalysis::new(classify(query), length);

    match analysis.answer_type {
        AnswerType::Mathematical => {
            if response.chars().any(|c| c.is_ascii_digit()) {
                analysis.contains_calculation = true;
                let math = validate_math(query, response);
                match (math.status, math.expected_result, math.provided_result) {
                    (MathStatus::Verified, Some(expected), _) => analysis
                        .specific_patterns
                        .push(format!("Mathematical calculation verified as correct: {expected}")),
                    (MathStatus::Mismatch, Some(expected), Some(provided)) => analysis
                        .potential_issues
                        .push(format!("Mathematical error: Expected {expected}, got {provided}")),
                    _ => analysis
                        .potential_issues
                        .push("Could not verify mathematical calculation".to_string()),
                }
                analysis.math_validation = Some(math);
            } else {
                analysis
                    .potential_issues
                    .push("Mathematical query but no numerical answer found".to_string());
            }
        }
        AnswerType::Weather => {
            if contains_any(&response.to_lowercase(), WEATHER_VOCABULARY) {
                analysis.contains_factual_info = true;
                analysis
                    .specific_patterns
                    .push("Contains weather-related information".to_string());
            } else {
                analysis
                    .potential_issues
                    .push("Weather query but no weather information in response".to_string());
            }
        }
        AnswerType::Informational => {
            if length > 30 {
                analysis.contains_factual_info = true;
            } else {
                analysis
                    .potential_issues
                    .push("Informational query but response seems too brief".to_string());
            }
        }
        AnswerType::Unknown | AnswerType::ErrorHandling => {}
    }

    if length < 10 {
        analysis
            .potential_issues
            .push("Response appears too short".to_string());
    } else if length > 500 {
        analysis
            .potential_issues
            .push("Response might be unnecessarily long".to_string());
    }

    analysis
}
