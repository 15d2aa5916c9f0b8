//! Pattern based field extraction from free-form candidate utterances.
//!
//! Every extractor is a pure function over a single utterance. A miss is
//! `None` (or an empty list), never an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest utterance kept after sanitizing, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Role, seniority and domain terms in priority order.
pub const POSITION_KEYWORDS: &[&str] = &[
    "developer", "engineer", "architect", "manager", "lead", "senior", "junior",
    "frontend", "backend", "fullstack", "devops", "data scientist", "analyst",
    "consultant", "specialist", "coordinator",
];

/// Locative triggers in priority order. Plain "in" comes first, so it also
/// fires inside words like "main"; that is a known limitation of the heuristic.
pub const LOCATION_KEYWORDS: &[&str] = &["in", "at", "live in", "based in", "from", "located in"];

/// Tokens that end a location phrase.
const LOCATION_BOUNDARIES: &[&str] = &[".", ",", " and", " but", " with"];

const MIN_LOCATION_CHARS: usize = 3;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>"']"#).unwrap());

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap());

static EXPERIENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:years?|yrs?)\s*experience").unwrap());

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"my name is\s+([a-z\s]+)").unwrap(),
        Regex::new(r"i am\s+([a-z\s]+)").unwrap(),
        Regex::new(r"name[:\s]+([a-z\s]+)").unwrap(),
        Regex::new(r"call me\s+([a-z\s]+)").unwrap(),
    ]
});

/// Strips angle brackets and quote characters, caps the length and trims.
pub fn sanitize_input(text: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(text, "");
    let truncated: String = stripped.chars().take(MAX_INPUT_CHARS).collect();
    truncated.trim().to_string()
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// Only matches "<n> year(s)/yr(s) experience"; a number and the word
/// "experience" elsewhere in the sentence are not enough.
pub fn extract_experience_years(text: &str) -> Option<String> {
    EXPERIENCE_PATTERN
        .captures(&text.to_lowercase())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// The first trigger phrase in priority order decides the match, not the
/// earliest one in the text.
pub fn extract_name(text: &str) -> Option<String> {
    let text_lower = text.to_lowercase();

    for pattern in NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&text_lower) {
            let name = caps.get(1).map(|m| title_case(m.as_str())).unwrap_or_default();
            return if name.is_empty() { None } else { Some(name) };
        }
    }

    None
}

pub fn extract_position(text: &str) -> Option<String> {
    let text_lower = text.to_lowercase();
    POSITION_KEYWORDS
        .iter()
        .find(|keyword| text_lower.contains(*keyword))
        .map(|keyword| keyword.to_string())
}

pub fn extract_location(text: &str) -> Option<String> {
    // ASCII folding keeps byte offsets aligned with `text`.
    let text_lower = text.to_ascii_lowercase();

    for keyword in LOCATION_KEYWORDS {
        let Some(found) = text_lower.find(keyword) else {
            continue;
        };
        let start = found + keyword.len();
        let end = LOCATION_BOUNDARIES
            .iter()
            .filter_map(|boundary| text_lower[start..].find(boundary).map(|pos| start + pos))
            .min()
            .unwrap_or(text.len());

        let location = text[start..end].trim();
        if location.chars().count() >= MIN_LOCATION_CHARS {
            return Some(location.to_string());
        }
    }

    None
}

/// Every vocabulary entry that occurs as a substring, in vocabulary order.
/// Short entries such as "go" also match inside longer words ("google").
pub fn extract_tech_stack<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for tech in vocabulary {
        let tech = tech.as_ref();
        if text_lower.contains(tech) && !found.iter().any(|t| t == tech) {
            found.push(tech.to_string());
        }
    }

    found
}

/// First exit keyword contained anywhere in the utterance, case-insensitive.
pub fn find_exit_keyword<'a, S: AsRef<str>>(text: &str, keywords: &'a [S]) -> Option<&'a str> {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .map(AsRef::as_ref)
        .find(|keyword| text_lower.contains(*keyword))
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
