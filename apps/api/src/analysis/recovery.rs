//! Output recovery: turns LLM text that is supposed to be JSON into a JSON object.
//!
//! Strategies run in a fixed order and the first one that yields an object wins:
//! 1. strict parse of the untouched text
//! 2. strict parse after stripping a markdown code fence
//! 3. brace forcing (slice `{ … }` out of prose, or wrap bare `key: value` lines)
//! 4. per-key regex scraping of the fields the résumé schema knows about
//!
//! Only a JSON object counts as success. If scraping finds nothing the caller
//! gets `RecoveryError::Exhausted` and is expected to fall back to heuristics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("could not recover a JSON object from LLM output")]
    Exhausted,
}

/// Keys the field scraper searches for when nothing parses as JSON.
pub const SCRAPED_KEYS: &[&str] = &[
    "name",
    "email",
    "phone",
    "core_skills",
    "soft_skills",
    "work_experience",
    "education",
    "summary",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Unfenced,
    BraceForced,
    FieldScrape,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Unfenced => "unfenced",
            Strategy::BraceForced => "brace_forced",
            Strategy::FieldScrape => "field_scrape",
        }
    }
}

type StrategyFn = fn(&str) -> Option<JsonObject>;

const STRATEGIES: [(Strategy, StrategyFn); 4] = [
    (Strategy::Direct, parse_object),
    (Strategy::Unfenced, parse_unfenced),
    (Strategy::BraceForced, parse_brace_forced),
    (Strategy::FieldScrape, scrape_fields),
];

static FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("valid fence regex"));
static FENCE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("valid fence regex"));
static KEY_VALUE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*["']?\w+["']?\s*:"#).expect("valid key regex"));
static LIST_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']([^"']+)["']|([^,\[\]]+)"#).expect("valid token regex"));

/// One pattern per scraped key. The value is a bracketed array, a braced
/// object, a quoted string, or anything up to the next comma or newline.
static FIELD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SCRAPED_KEYS
        .iter()
        .map(|&key| {
            let pattern = format!(
                r#"(?i)"?{key}"?\s*:\s*(\[[^\]]*\]|\{{[^}}]*\}}|"(?:[^"\\]|\\.)*"|[^\n,]+)"#
            );
            (key, Regex::new(&pattern).expect("valid field regex"))
        })
        .collect()
});

/// Recovers a JSON object from `text`, trying each strategy in order.
pub fn recover(text: &str) -> Result<JsonObject, RecoveryError> {
    recover_with_strategy(text).map(|(object, _)| object)
}

/// Same as [`recover`] but also reports which strategy succeeded.
pub fn recover_with_strategy(text: &str) -> Result<(JsonObject, Strategy), RecoveryError> {
    for (strategy, attempt) in STRATEGIES {
        if let Some(object) = attempt(text) {
            debug!(
                strategy = strategy.name(),
                keys = object.len(),
                "Recovered structured LLM output"
            );
            return Ok((object, strategy));
        }
    }
    Err(RecoveryError::Exhausted)
}

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

fn parse_unfenced(text: &str) -> Option<JsonObject> {
    parse_object(&strip_fences(text))
}

fn parse_brace_forced(text: &str) -> Option<JsonObject> {
    parse_object(&force_braces(text)?)
}

/// Strips a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
fn strip_fences(text: &str) -> String {
    let text = FENCE_OPEN.replace(text.trim(), "");
    FENCE_CLOSE.replace(&text, "").trim().to_string()
}

fn force_braces(text: &str) -> Option<String> {
    let text = strip_fences(text);

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        return (start < end).then(|| text[start..=end].to_string());
    }

    if KEY_VALUE_START.is_match(&text) {
        return Some(format!("{{{text}}}"));
    }

    None
}

fn scrape_fields(text: &str) -> Option<JsonObject> {
    let mut object = JsonObject::new();

    for (key, pattern) in FIELD_PATTERNS.iter() {
        let Some(raw) = pattern.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };
        object.insert((*key).to_string(), scraped_value(raw.as_str().trim()));
    }

    (!object.is_empty()).then_some(object)
}

fn scraped_value(raw: &str) -> Value {
    if raw.starts_with('[') || raw.starts_with('{') {
        return serde_json::from_str(raw).unwrap_or_else(|_| {
            Value::Array(tokenize_list(raw).into_iter().map(Value::String).collect())
        });
    }

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        // Prefer a proper JSON unescape; fall back to dropping the quotes.
        return serde_json::from_str::<String>(raw)
            .map(Value::String)
            .unwrap_or_else(|_| Value::String(raw[1..raw.len() - 1].to_string()));
    }

    Value::String(raw.trim_end_matches(',').trim().to_string())
}

/// Splits a malformed list on commas while keeping quoted items intact.
fn tokenize_list(raw: &str) -> Vec<String> {
    LIST_TOKEN
        .captures_iter(raw)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '{' | '}'))
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}
