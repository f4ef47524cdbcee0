//! Filter for keyboard mashing and other input that carries no request.
//!
//! The rules are deliberately conservative: a short command such as `2+2`
//! must always get through, so every check only fires on fairly strong
//! evidence of randomness.

use std::collections::{HashMap, HashSet};

const VOWELS: &str = "aeiou";
const CONSONANTS: &str = "bcdfghjklmnpqrstvwxyz";

/// Strings made only of one of these sets look like a finger run across the
/// keyboard.
const KEYBOARD_RUNS: [&str; 4] = ["yh", "qwerty", "asdfgh", "zxcvbn"];

const COMMON_WORDS: &[&str] = &[
    "the", "and", "is", "in", "to", "of", "a", "that", "it", "with", "for", "as", "was", "on",
    "are", "you", "this", "be", "at", "have", "or", "not", "from", "by", "they", "we", "say",
    "her", "she", "an", "each", "which", "do", "how", "their", "if", "will", "up", "other",
    "about", "out", "many", "then", "them", "these", "so", "some", "what", "would", "make",
    "like", "into", "time", "has", "two", "more", "go", "no", "way", "could", "my", "than",
    "first", "been", "call", "who", "oil", "its", "now", "find", "long", "down", "day", "did",
    "get", "come", "made", "may", "part", "weather", "calculate", "news", "search", "tell", "me",
    "when", "where", "why", "university", "heriot", "watt",
];

/// Returns true when `query` looks like random characters rather than a
/// question or command.
pub fn is_meaningless(query: &str) -> bool {
    let cleaned = query.trim().to_lowercase();
    let chars: Vec<char> = cleaned.chars().collect();
    let len = chars.len();

    if len < 3 {
        return true;
    }

    let distinct: HashSet<char> = chars.iter().copied().collect();
    if distinct.len() <= 2 && len > 5 {
        return true;
    }

    if len > 10 && distinct.len() <= 4 {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in &chars {
            *counts.entry(*c).or_default() += 1;
        }
        let max_count = counts.values().copied().max().unwrap_or(0);
        if max_count as f64 >= len as f64 * 0.3 {
            return true;
        }
    }

    if has_repeated_unit(&chars) {
        return true;
    }

    if has_implausible_letter_mix(&chars) {
        return true;
    }

    if len > 10 && matches_prefix_tiling(&chars) {
        return true;
    }

    if len > 8
        && KEYBOARD_RUNS
            .iter()
            .any(|run| chars.iter().all(|c| run.contains(*c)))
    {
        return true;
    }

    if len > 10 && count_word_like_tokens(&cleaned) == 0 {
        return true;
    }

    false
}

/// A unit of 1-3 characters followed by at least four more copies of itself,
/// e.g. `abababababab` or `xxxxx`.
fn has_repeated_unit(chars: &[char]) -> bool {
    for start in 0..chars.len() {
        for unit_len in 1..=3 {
            let unit_end = start + unit_len;
            if unit_end > chars.len() {
                break;
            }
            let unit = &chars[start..unit_end];
            if unit.contains(&'\n') {
                continue;
            }

            let mut repeats = 0;
            let mut pos = unit_end;
            while pos + unit_len <= chars.len() && &chars[pos..pos + unit_len] == unit {
                repeats += 1;
                pos += unit_len;
            }
            if repeats >= 4 {
                return true;
            }
        }
    }
    false
}

fn has_implausible_letter_mix(chars: &[char]) -> bool {
    let letters: Vec<char> = chars.iter().copied().filter(|c| c.is_alphabetic()).collect();
    if letters.len() <= 5 {
        return false;
    }

    let vowels = letters.iter().filter(|c| VOWELS.contains(**c)).count();
    let consonants = letters.iter().filter(|c| CONSONANTS.contains(**c)).count();

    if vowels == 0 && consonants > 5 {
        return true;
    }
    vowels > 0 && consonants as f64 / vowels as f64 > 8.0
}

/// Tiles the first 2..=5 characters across the string and checks how much of
/// the query the tiling reproduces.
fn matches_prefix_tiling(chars: &[char]) -> bool {
    let len = chars.len();
    for unit_len in 2..=5 {
        let repetitions = len / unit_len;
        if repetitions < 3 {
            continue;
        }
        let tiled_len = unit_len * repetitions;
        let matching = (0..tiled_len)
            .filter(|&i| chars[i] == chars[i % unit_len])
            .count();
        if matching as f64 / len as f64 > 0.7 {
            return true;
        }
    }
    false
}

fn count_word_like_tokens(cleaned: &str) -> usize {
    cleaned
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| word.len() >= 3 && (word.len() >= 4 || COMMON_WORDS.contains(word)))
        .count()
}
