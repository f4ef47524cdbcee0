use super::report::ValidationReport;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

const RECENT_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationTrend {
    Improving,
    Stable,
    #[serde(rename = "Needs attention")]
    NeedsAttention,
}

impl ValidationTrend {
    fn from_accuracy(rate: f64) -> Self {
        if rate > 80.0 {
            ValidationTrend::Improving
        } else if rate < 60.0 {
            ValidationTrend::NeedsAttention
        } else {
            ValidationTrend::Stable
        }
    }
}

impl fmt::Display for ValidationTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationTrend::Improving => f.write_str("Improving"),
            ValidationTrend::Stable => f.write_str("Stable"),
            ValidationTrend::NeedsAttention => f.write_str("Needs attention"),
        }
    }
}

/// Aggregate statistics over the retained validation reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Reports recorded since start, including evicted ones.
    pub total_validations: u64,
    pub retained_validations: usize,
    pub accuracy_rate: f64,
    pub average_confidence: f64,
    pub recent_average_confidence: f64,
    pub recent_correct: usize,
    pub recent_total: usize,
    pub latest_validation: String,
    pub validation_trend: ValidationTrend,
}

/// Bounded FIFO of validation reports; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct ValidationHistory {
    entries: VecDeque<ValidationReport>,
    capacity: usize,
    total_recorded: u64,
}

impl ValidationHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_recorded: 0,
        }
    }

    pub fn push(&mut self, report: ValidationReport) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(report);
        self.total_recorded += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationReport> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ValidationReport> {
        self.entries.back()
    }

    /// `None` until the first report is recorded.
    pub fn summary(&self) -> Option<ValidationSummary> {
        let latest = self.entries.back()?;
        let retained = self.entries.len();

        let correct = self.entries.iter().filter(|r| r.validation_decision).count();
        let confidence_sum: f64 = self
            .entries
            .iter()
            .map(|r| f64::from(r.confidence_level))
            .sum();
        let accuracy_rate = correct as f64 / retained as f64 * 100.0;

        let recent: Vec<&ValidationReport> =
            self.entries.iter().skip(retained.saturating_sub(RECENT_WINDOW)).collect();
        let recent_confidence: f64 = recent.iter().map(|r| f64::from(r.confidence_level)).sum();

        Some(ValidationSummary {
            total_validations: self.total_recorded,
            retained_validations: retained,
            accuracy_rate: round1(accuracy_rate),
            average_confidence: round1(confidence_sum / retained as f64),
            recent_average_confidence: round1(recent_confidence / recent.len() as f64),
            recent_correct: recent.iter().filter(|r| r.validation_decision).count(),
            recent_total: recent.len(),
            latest_validation: latest.timestamp.clone(),
            validation_trend: ValidationTrend::from_accuracy(accuracy_rate),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflector::report::*;

    fn report(correct: bool, confidence: u8, timestamp: &str) -> ValidationReport {
        ValidationReport {
            timestamp: timestamp.to_string(),
            original_query: "q".into(),
            mrkl_response: "r".into(),
            validation_decision: correct,
            confidence_level: confidence,
            validation_reasoning: String::new(),
            answer_analysis: AnswerAnalysis::new(AnswerType::Unknown, 1),
            reasoning_validation: ReasoningValidation {
                step_count: 0,
                logical_consistency: true,
                completeness_score: 100,
                step_issues: vec![],
                missing_steps: vec![],
                reasoning_quality: ReasoningQuality::Excellent,
            },
            ai_validation: AiValidation {
                ai_confidence: 90,
                ai_decision: AiDecision::Correct,
                ai_reasoning: String::new(),
                model_used: "Rule-Based Validator".into(),
                validation_successful: true,
            },
            improvement_suggestions: vec![],
            validation_status: ValidationStatus::from_decision(correct),
        }
    }

    #[test]
    fn test_empty_history_has_no_summary() {
        assert!(ValidationHistory::new(10).summary().is_none());
    }

    #[test]
    fn test_eviction_keeps_capacity() {
        let mut history = ValidationHistory::new(3);
        for i in 0..5 {
            history.push(report(true, 90, &format!("t{i}")));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.total_recorded(), 5);
        let stamps: Vec<_> = history.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn test_summary_statistics() {
        let mut history = ValidationHistory::new(100);
        history.push(report(false, 20, "t0"));
        for i in 1..7 {
            history.push(report(true, 95, &format!("t{i}")));
        }

        let summary = history.summary().unwrap();
        assert_eq!(summary.total_validations, 7);
        assert_eq!(summary.retained_validations, 7);
        // 6 of 7 correct
        assert_eq!(summary.accuracy_rate, 85.7);
        assert_eq!(summary.average_confidence, 84.3);
        assert_eq!(summary.recent_total, 5);
        assert_eq!(summary.recent_correct, 5);
        assert_eq!(summary.recent_average_confidence, 95.0);
        assert_eq!(summary.latest_validation, "t6");
        assert_eq!(summary.validation_trend, ValidationTrend::Improving);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(ValidationTrend::from_accuracy(80.0), ValidationTrend::Stable);
        assert_eq!(ValidationTrend::from_accuracy(60.0), ValidationTrend::Stable);
        assert_eq!(ValidationTrend::from_accuracy(59.9), ValidationTrend::NeedsAttention);
        assert_eq!(ValidationTrend::NeedsAttention.to_string(), "Needs attention");
    }
}
