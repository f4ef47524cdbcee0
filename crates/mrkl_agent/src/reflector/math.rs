//! Independent re-check of arithmetic answers.

use super::report::{MathStatus, MathValidation};
use crate::calc::{self, approx_eq, Number};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn expression_patterns() -> &'static [Regex; 4] {
    static RE: OnceLock<[Regex; 4]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"((?:[-+]\s*)?[(\d][\d.+\-*/^()\s]*[\d)])").expect("valid regex"),
            Regex::new(r"(?i)calculate\s+([0-9+\-*/.^() ]+)").expect("valid regex"),
            Regex::new(r"(?i)what['s]*\s+([0-9+\-*/.^() ]+)\?*").expect("valid regex"),
            Regex::new(r"(?i)([0-9+\-*/.^() ]+)\s*=").expect("valid regex"),
        ]
    })
}

fn result_patterns() -> &'static [Regex; 5] {
    static RE: OnceLock<[Regex; 5]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"(?i)=\s*(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)").expect("valid regex"),
            Regex::new(r"(?i)result[:\s]+(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)").expect("valid regex"),
            Regex::new(r"(?i)answer[:\s]+(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)").expect("valid regex"),
            Regex::new(r"(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)$").expect("valid regex"),
            Regex::new(r":\s*(-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)").expect("valid regex"),
        ]
    })
}

fn any_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?").expect("valid regex"))
}

fn binary_operator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d)]\s*[+\-*/^]").expect("valid regex"))
}

/// Pulls the arithmetic expression out of a question such as
/// "What's 15 * 23 + 100?".
///
/// The first candidate is the whole operator run, leading sign and
/// parentheses included, so `-3 + 5` is never shortened to `3 + 5`.
pub fn extract_expression(query: &str) -> Option<String> {
    let query = query.replace('×', "*").replace('÷', "/");
    let [operator_run, fallbacks @ ..] = expression_patterns();

    let run = operator_run
        .find_iter(&query)
        .map(|m| trim_unmatched_parens(m.as_str().trim()))
        .find(|run| binary_operator_regex().is_match(run));
    if let Some(run) = run {
        return Some(run.to_string());
    }

    fallbacks.iter().find_map(|pattern| {
        let expression = pattern.captures(&query)?.get(1)?.as_str().trim().to_string();
        let has_digit = expression.chars().any(|c| c.is_ascii_digit());
        let has_operator = expression.chars().any(|c| "+-*/^".contains(c));
        (has_digit && has_operator).then_some(expression)
    })
}

// Drops a stray `)` at the end or `(` at the start that belongs to the
// surrounding prose, e.g. "(what is 2 + 3)".
fn trim_unmatched_parens(mut run: &str) -> &str {
    loop {
        let opens = run.matches('(').count();
        let closes = run.matches(')').count();
        if closes > opens && run.ends_with(')') {
            run = run[..run.len() - 1].trim_end();
        } else if opens > closes && run.starts_with('(') {
            run = run[1..].trim_start();
        } else {
            return run;
        }
    }
}

/// Finds the number the response presents as its answer.
pub fn extract_result(response: &str) -> Option<Number> {
    let labelled = result_patterns().iter().find_map(|pattern| {
        let captured = pattern.captures(response)?.get(1)?;
        Number::parse_decimal(captured.as_str())
    });
    labelled.or_else(|| {
        any_number_regex()
            .find_iter(response)
            .last()
            .and_then(|m| Number::parse_decimal(m.as_str()))
    })
}

pub fn validate_math(query: &str, response: &str) -> MathValidation {
    let mut validation = MathValidation {
        status: MathStatus::Unverified,
        is_correct: true,
        expected_result: None,
        provided_result: None,
        expression: None,
    };

    let Some(expression) = extract_expression(query) else {
        debug!("No arithmetic expression found in {query:?}");
        return validation;
    };
    validation.expression = Some(expression.clone());

    let safe_expression = expression.replace('^', "**").replace(['x', 'X'], "*");
    if !calc::has_only_allowed_chars(&safe_expression) {
        return validation;
    }
    let expected = match calc::evaluate(&safe_expression) {
        Ok(value) => value,
        Err(e) => {
            debug!("Could not re-evaluate {safe_expression:?}: {e}");
            return validation;
        }
    };
    validation.expected_result = Some(expected);

    let Some(provided) = extract_result(response) else {
        return validation;
    };
    validation.provided_result = Some(provided);

    if approx_eq(expected, provided) {
        validation.status = MathStatus::Verified;
    } else {
        validation.status = MathStatus::Mismatch;
        validation.is_correct = false;
    }
    validation
}
