//! Restricted arithmetic evaluator.
//!
//! Accepts numbers, parentheses, unary `+`/`-` and the binary operators
//! `+ - * / // **`. Integers stay integers under `+ - *` and non-negative
//! integer powers; `/` always yields a float. Unary minus binds looser than
//! `**`, so `-2 ** 2` is `-4`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const PI_LITERAL: &str = "3.141592653589793";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid syntax")]
    Syntax,
    #[error("invalid number literal '{0}'")]
    Literal(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
    #[error("numerical result out of range")]
    OutOfRange,
    #[error("negative number cannot be raised to a fractional power")]
    ComplexResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Parses a decimal as it appears in text: with a `.` or an exponent
    /// (`5e-05`) it is a float, otherwise an integer.
    pub fn parse_decimal(text: &str) -> Option<Number> {
        if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().map(Number::Float)
        } else {
            text.parse::<i64>().ok().map(Number::Int)
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Float rendering with a mandatory fractional part (`5.0`) and exponent
/// notation for very large or very small magnitudes (`1e+20`, `1e-05`).
fn format_float(x: f64) -> String {
    if !x.is_finite() {
        return if x.is_nan() { "nan".into() } else if x > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{x:e}");
        if let Some((mantissa, exponent)) = formatted.split_once('e') {
            if let Ok(exp) = exponent.parse::<i32>() {
                let sign = if exp < 0 { '-' } else { '+' };
                return format!("{mantissa}e{sign}{:02}", exp.abs());
            }
        }
        return formatted;
    }
    let formatted = format!("{x}");
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// Two results are equal when both are integers and identical, or within
/// 0.01 of each other when either is a float.
pub fn approx_eq(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x == y,
        _ => (a.as_f64() - b.as_f64()).abs() < 0.01,
    }
}

/// Rewrites the notations users type (`^`, `×`, `÷`, `π`, `pi`) into the
/// evaluator's operator set.
pub fn normalize(expression: &str) -> String {
    expression
        .replace('^', "**")
        .replace('×', "*")
        .replace('÷', "/")
        .replace('π', PI_LITERAL)
        .replace("pi", PI_LITERAL)
}

/// True when every character is a digit, whitespace, `.`, a parenthesis or
/// an arithmetic operator.
pub fn has_only_allowed_chars(expression: &str) -> bool {
    expression
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(c))
}

/// Evaluates an already normalized expression.
pub fn evaluate(expression: &str) -> Result<Number, CalcError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(CalcError::Syntax);
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Power,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token::Num(parse_literal(&literal)?));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Power);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return Err(CalcError::Syntax),
        }
    }

    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<Number, CalcError> {
    let invalid = || CalcError::Literal(literal.to_string());
    if literal.matches('.').count() > 1 || literal == "." {
        return Err(invalid());
    }
    if literal.contains('.') {
        literal.parse::<f64>().map(Number::Float).map_err(|_| invalid())
    } else {
        literal.parse::<i64>().map(Number::Int).map_err(|_| CalcError::Overflow)
    }
}

// Grammar:
//   expression := term (('+' | '-') term)*
//   term       := unary (('*' | '/' | '//') unary)*
//   unary      := ('+' | '-') unary | power
//   power      := atom ('**' unary)?
//   atom       := number | '(' expression ')'
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expression(&mut self) -> Result<Number, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value = add(value, self.term()?)?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value = sub(value, self.term()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<Number, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value = mul(value, self.unary()?)?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value = div(value, self.unary()?)?;
                }
                Some(Token::DoubleSlash) => {
                    self.pos += 1;
                    value = floor_div(value, self.unary()?)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<Number, CalcError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                neg(self.unary()?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, CalcError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            return pow(base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Number, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(CalcError::Syntax),
                }
            }
            _ => Err(CalcError::Syntax),
        }
    }
}

fn finite(x: f64) -> Result<Number, CalcError> {
    if x.is_finite() {
        Ok(Number::Float(x))
    } else {
        Err(CalcError::OutOfRange)
    }
}

fn add(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => finite(a.as_f64() + b.as_f64()),
    }
}

fn sub(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_sub(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => finite(a.as_f64() - b.as_f64()),
    }
}

fn mul(a: Number, b: Number) -> Result<Number, CalcError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.checked_mul(y).map(Number::Int).ok_or(CalcError::Overflow),
        _ => finite(a.as_f64() * b.as_f64()),
    }
}

fn div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.as_f64() == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    finite(a.as_f64() / b.as_f64())
}

fn floor_div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.as_f64() == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => {
            let q = x.checked_div(y).ok_or(CalcError::Overflow)?;
            // Round toward negative infinity.
            let q = if (x % y != 0) && ((x < 0) != (y < 0)) { q - 1 } else { q };
            Ok(Number::Int(q))
        }
        _ => finite((a.as_f64() / b.as_f64()).floor()),
    }
}

fn neg(a: Number) -> Result<Number, CalcError> {
    match a {
        Number::Int(x) => x.checked_neg().map(Number::Int).ok_or(CalcError::Overflow),
        Number::Float(x) => Ok(Number::Float(-x)),
    }
}

fn pow(base: Number, exponent: Number) -> Result<Number, CalcError> {
    if base.as_f64() == 0.0 && exponent.as_f64() < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    match (base, exponent) {
        // Exponents beyond u32 are fine for these bases.
        (Number::Int(b @ (0 | 1)), Number::Int(e)) if e >= 0 => {
            Ok(Number::Int(if e == 0 { 1 } else { b }))
        }
        (Number::Int(-1), Number::Int(e)) if e >= 0 => {
            Ok(Number::Int(if e % 2 == 0 { 1 } else { -1 }))
        }
        (Number::Int(b), Number::Int(e)) if e >= 0 => {
            let e = u32::try_from(e).map_err(|_| CalcError::Overflow)?;
            b.checked_pow(e).map(Number::Int).ok_or(CalcError::Overflow)
        }
        _ => {
            let (b, e) = (base.as_f64(), exponent.as_f64());
            if b < 0.0 && e.fract() != 0.0 {
                return Err(CalcError::ComplexResult);
            }
            finite(b.powf(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Number {
        evaluate(&normalize(expr)).unwrap()
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval("15 * 23 + 100"), Number::Int(445));
        assert_eq!(eval("2 + 3 * 4"), Number::Int(14));
        assert_eq!(eval("(2 + 3) * 4"), Number::Int(20));
        assert_eq!(eval("10 - 2 - 3"), Number::Int(5));
        assert_eq!(eval("7 // 2"), Number::Int(3));
        assert_eq!(eval("-7 // 2"), Number::Int(-4));
    }

    #[test]
    fn test_division_is_float() {
        assert_eq!(eval("10 / 4"), Number::Float(2.5));
        assert_eq!(eval("10 / 5"), Number::Float(2.0));
        assert_eq!(eval("10 / 5").to_string(), "2.0");
    }

    #[test]
    fn test_power() {
        assert_eq!(eval("2^10"), Number::Int(1024));
        assert_eq!(eval("2 ** 3 ** 2"), Number::Int(512));
        assert_eq!(eval("-2 ** 2"), Number::Int(-4));
        assert_eq!(eval("2 ** -1"), Number::Float(0.5));
        assert_eq!(eval("3.14*5^2").to_string(), "78.5");
    }

    #[test]
    fn test_power_of_unit_bases_with_huge_exponent() {
        assert_eq!(eval("1 ** 10000000000"), Number::Int(1));
        assert_eq!(eval("0 ** 10000000000"), Number::Int(0));
        assert_eq!(eval("0 ** 0"), Number::Int(1));
        assert_eq!(eval("(-1) ** 10000000001"), Number::Int(-1));
        assert_eq!(eval("(-1) ** 10000000000"), Number::Int(1));
        assert_eq!(evaluate("2 ** 10000000000"), Err(CalcError::Overflow));
    }

    #[test]
    fn test_pi_and_symbols() {
        assert_eq!(eval("6 × 7"), Number::Int(42));
        assert_eq!(eval("9 ÷ 3"), Number::Float(3.0));
        match eval("pi * 2") {
            Number::Float(x) => assert!((x - std::f64::consts::TAU).abs() < 1e-12),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1 // 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("0 ** -1"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("2 ** 100"), Err(CalcError::Overflow));
        assert_eq!(evaluate("(-8) ** 0.5"), Err(CalcError::ComplexResult));
        assert_eq!(evaluate("2 +"), Err(CalcError::Syntax));
        assert_eq!(evaluate("(1 + 2"), Err(CalcError::Syntax));
        assert_eq!(evaluate("2 (3)"), Err(CalcError::Syntax));
        assert!(matches!(evaluate("1.2.3"), Err(CalcError::Literal(_))));
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(Number::Float(5.0).to_string(), "5.0");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Number::Float(1e20).to_string(), "1e+20");
        assert_eq!(Number::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Number::Int(-12).to_string(), "-12");
    }

    #[test]
    fn test_allowed_chars() {
        assert!(has_only_allowed_chars("(1 + 2) * 3 / 4.5 - 1"));
        assert!(!has_only_allowed_chars("2 x 3"));
        assert!(!has_only_allowed_chars("import os"));
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(Number::Int(4), Number::Int(4)));
        assert!(!approx_eq(Number::Int(4), Number::Int(5)));
        assert!(approx_eq(Number::Float(78.539), Number::Float(78.5375)));
        assert!(approx_eq(Number::Int(2), Number::Float(2.0)));
        assert!(!approx_eq(Number::Float(2.5), Number::Int(2)));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Number::parse_decimal("445"), Some(Number::Int(445)));
        assert_eq!(Number::parse_decimal("-3.5"), Some(Number::Float(-3.5)));
        assert_eq!(Number::parse_decimal("5e-05"), Some(Number::Float(5e-5)));
        assert_eq!(Number::parse_decimal("1e+16"), Some(Number::Float(1e16)));
        assert_eq!(Number::parse_decimal("abc"), None);
    }
}
