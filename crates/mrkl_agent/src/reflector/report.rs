use crate::calc::Number;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Mathematical,
    Weather,
    Informational,
    Unknown,
    ErrorHandling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathStatus {
    /// Re-evaluated and the answer matches
    Verified,
    /// Re-evaluated and the answer differs
    Mismatch,
    /// Expression or answer could not be extracted or evaluated
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathValidation {
    pub status: MathStatus,
    pub is_correct: bool,
    pub expected_result: Option<Number>,
    pub provided_result: Option<Number>,
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerAnalysis {
    pub answer_type: AnswerType,
    pub contains_calculation: bool,
    pub contains_factual_info: bool,
    pub response_length: usize,
    pub specific_patterns: Vec<String>,
    pub potential_issues: Vec<String>,
    pub math_validation: Option<MathValidation>,
}

impl AnswerAnalysis {
    pub fn new(answer_type: AnswerType, response_length: usize) -> Self {
        Self {
            answer_type,
            contains_calculation: false,
            contains_factual_info: false,
            response_length,
            specific_patterns: Vec::new(),
            potential_issues: Vec::new(),
            math_validation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasoningQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningValidation {
    pub step_count: usize,
    pub logical_consistency: bool,
    pub completeness_score: u8,
    pub step_issues: Vec<String>,
    pub missing_steps: Vec<String>,
    pub reasoning_quality: ReasoningQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiDecision {
    Correct,
    Incorrect,
}

/// Output of the rule-based second opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiValidation {
    pub ai_confidence: u8,
    pub ai_decision: AiDecision,
    pub ai_reasoning: String,
    pub model_used: String,
    pub validation_successful: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Correct,
    Incorrect,
}

impl ValidationStatus {
    pub fn from_decision(is_correct: bool) -> Self {
        if is_correct {
            ValidationStatus::Correct
        } else {
            ValidationStatus::Incorrect
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Correct => f.write_str("CORRECT"),
            ValidationStatus::Incorrect => f.write_str("INCORRECT"),
        }
    }
}

/// Verdict on one processed query. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub original_query: String,
    pub mrkl_response: String,
    pub validation_decision: bool,
    pub confidence_level: u8,
    pub validation_reasoning: String,
    pub answer_analysis: AnswerAnalysis,
    pub reasoning_validation: ReasoningValidation,
    pub ai_validation: AiValidation,
    pub improvement_suggestions: Vec<String>,
    pub validation_status: ValidationStatus,
}
