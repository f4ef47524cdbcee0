use super::report::{
    AiDecision, AiValidation, AnswerAnalysis, AnswerType, MathStatus, ReasoningValidation,
};

const BASE_CONFIDENCE: i32 = 85;
const MIN_CONFIDENCE: i32 = 20;
const MAX_CONFIDENCE: i32 = 95;
const MAX_MINOR_SUGGESTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub is_correct: bool,
    pub confidence: u8,
    pub reasoning: String,
    pub suggestions: Vec<String>,
}

/// Combines answer analysis, reasoning score and the heuristic opinion into
/// a single verdict. Only major issues can flag an answer.
pub fn decide(
    analysis: &AnswerAnalysis,
    reasoning: &ReasoningValidation,
    ai: &AiValidation,
) -> Decision {
    let mut confidence = BASE_CONFIDENCE;
    let mut parts: Vec<String> = Vec::new();
    let mut major_issues: Vec<String> = Vec::new();
    let mut math_mismatch = false;

    if let Some(math) = &analysis.math_validation {
        match math.status {
            MathStatus::Verified => {
                parts.push("Mathematical calculation verified as correct".to_string());
                confidence = 90;
            }
            MathStatus::Mismatch => {
                let expected = math
                    .expected_result
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                let provided = math
                    .provided_result
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                major_issues.push(format!(
                    "Mathematical error: Expected {expected}, got {provided}"
                ));
                confidence = 30;
                math_mismatch = true;
            }
            MathStatus::Unverified => {
                parts.push("Mathematical calculation could not be verified".to_string());
            }
        }
    }

    match analysis.answer_type {
        AnswerType::Mathematical => {
            if analysis.contains_calculation {
                parts.push("Contains appropriate numerical calculation for math query".to_string());
            } else {
                major_issues.push("Mathematical query missing numerical answer".to_string());
            }
        }
        AnswerType::Weather => {
            if analysis.contains_factual_info {
                parts.push("Contains relevant weather information".to_string());
            } else {
                major_issues.push("Weather query missing weather information".to_string());
            }
        }
        AnswerType::Informational => {
            if analysis.contains_factual_info {
                parts.push("Contains appropriate factual information".to_string());
            } else if analysis.response_length < 20 {
                major_issues.push("Informational query has very brief response".to_string());
            }
        }
        AnswerType::Unknown | AnswerType::ErrorHandling => {}
    }

    let score = reasoning.completeness_score;
    parts.push(match score {
        80.. => format!("Strong reasoning process ({score}%)"),
        60..=79 => format!("Adequate reasoning process ({score}%)"),
        _ => format!("Basic reasoning process ({score}%)"),
    });

    if ai.validation_successful {
        match ai.ai_decision {
            AiDecision::Correct => {
                parts.push("Heuristic check confirms answer correctness".to_string());
                confidence = (confidence + 5).min(MAX_CONFIDENCE);
            }
            AiDecision::Incorrect => {
                parts.push("Heuristic check has concerns about the answer".to_string());
                confidence = (confidence - 15).max(40);
            }
        }
    } else {
        parts.push("Heuristic check unavailable".to_string());
    }

    let (is_correct, reasoning, suggestions) = if major_issues.is_empty() {
        let minor = analysis
            .potential_issues
            .iter()
            .filter(|issue| {
                !issue.contains("lacks clear result format") && !issue.contains("too brief")
            })
            .take(MAX_MINOR_SUGGESTIONS)
            .cloned()
            .collect();
        (
            true,
            format!("ANSWER VALIDATED: {}", parts.join(" | ")),
            minor,
        )
    } else {
        confidence = (confidence - 30).max(MIN_CONFIDENCE);
        if math_mismatch {
            confidence = confidence.min(30);
        }
        (
            false,
            format!("ANSWER FLAGGED: {}", major_issues.join(" | ")),
            major_issues,
        )
    };

    Decision {
        is_correct,
        confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE) as u8,
        reasoning,
        suggestions,
    }
}
