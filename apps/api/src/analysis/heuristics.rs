//! Heuristic field extraction. Regex based and independent of the LLM; it never fails.
//!
//! Used whenever the LLM path is unavailable or its output cannot be recovered.
//! Each extractor is independent; `extract_fields` runs all of them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{Education, ResumeFields, WorkExperience};

const NAME_SCAN_LINES: usize = 5;
const NAME_MAX_TOKENS: usize = 4;
const MAX_EXPERIENCE_LINES: usize = 6;
const MAX_EDUCATION_LINES: usize = 5;

/// Technologies recognised when a résumé has no explicit skills heading.
/// Matches are reported in this order.
const TECH_VOCABULARY: &[&str] = &[
    "Python",
    "JavaScript",
    "React",
    "Node",
    "Django",
    "Flask",
    "SQL",
    "Postgres",
    "Mongo",
    "AWS",
    "Docker",
    "Kubernetes",
    "Java",
    "C++",
    "TypeScript",
];

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex"));
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-\s]?)?(\(?\d{2,4}\)?[-\s]?)?\d{3,4}[-\s]?\d{3,4}")
        .expect("valid phone regex")
});
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid digit regex"));
static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));
static SKILLS_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(core skills|technical skills|skills)[:\-\n]+([^\n\r]+)")
        .expect("valid skills regex")
});
static SKILL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\u{2022}\-\n]+").expect("valid separator regex"));
static EXPERIENCE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(experience|work experience|professional experience)[:\n\r]+(.+?)(?:\n[ \t]*\n|\neducation|\n?$)",
    )
    .expect("valid experience regex")
});
static EDUCATION_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(education)[:\n\r]+(.+?)(?:\n[ \t]*\n|\nexperience|\n?$)")
        .expect("valid education regex")
});
static TITLE_AT_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<title>.+?)\s+at\s+(?P<company>.+?)(?:\s+\(|$)")
        .expect("valid title regex")
});
static EDUCATION_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,-]").expect("valid separator regex"));
static VOCABULARY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TECH_VOCABULARY
        .iter()
        .map(|&term| (term, vocabulary_pattern(term)))
        .collect()
});

/// Runs every extractor over the raw document text.
pub fn extract_fields(text: &str) -> ResumeFields {
    ResumeFields {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        linkedin_url: None,
        portfolio_url: None,
        core_skills: extract_skills(text),
        soft_skills: Vec::new(),
        work_experience: extract_work_experience(text),
        education: extract_education(text),
        summary: Some(extract_summary(text)),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE.find(text).map(|m| m.as_str().trim().to_string())
}

/// First of the leading non-blank lines that reads like a name:
/// no `@`, no digit, at most four words.
pub fn extract_name(text: &str) -> Option<String> {
    non_blank_lines(text)
        .take(NAME_SCAN_LINES)
        .find(|line| {
            !line.contains('@')
                && line.split_whitespace().count() <= NAME_MAX_TOKENS
                && !DIGIT.is_match(line)
        })
        .map(str::to_string)
}

/// Skills listed after a skills heading, or vocabulary hits if there is none.
pub fn extract_skills(text: &str) -> Vec<String> {
    let listed: Vec<String> = SKILLS_HEADING
        .captures(text)
        .and_then(|c| c.get(2))
        .map(|line| {
            SKILL_SEPARATOR
                .split(line.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if !listed.is_empty() {
        return listed;
    }

    VOCABULARY_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(term, _)| (*term).to_string())
        .collect()
}

pub fn extract_work_experience(text: &str) -> Vec<WorkExperience> {
    section_lines(&EXPERIENCE_BLOCK, text, MAX_EXPERIENCE_LINES)
        .into_iter()
        .map(|line| {
            let (title, company) = match TITLE_AT_COMPANY.captures(&line) {
                Some(c) => (c["title"].trim().to_string(), c["company"].trim().to_string()),
                None => (line.clone(), String::new()),
            };
            WorkExperience {
                title,
                company,
                description: line,
            }
        })
        .collect()
}

pub fn extract_education(text: &str) -> Vec<Education> {
    section_lines(&EDUCATION_BLOCK, text, MAX_EDUCATION_LINES)
        .into_iter()
        .map(|line| {
            let parts: Vec<&str> = EDUCATION_SEPARATOR
                .split(&line)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            let year = parts
                .last()
                .filter(|p| FOUR_DIGITS.is_match(p))
                .map(|p| p.to_string())
                .unwrap_or_default();
            Education {
                degree: parts
                    .first()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| line.clone()),
                institution: parts.get(1).map(|p| p.to_string()).unwrap_or_default(),
                year,
            }
        })
        .collect()
}

/// The second non-blank line, or an empty string.
pub fn extract_summary(text: &str) -> String {
    non_blank_lines(text).nth(1).unwrap_or_default().to_string()
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Captures the block after a section heading and returns its first
/// `limit` non-blank lines with bullets and indentation stripped.
fn section_lines(block: &Regex, text: &str, limit: usize) -> Vec<String> {
    let Some(body) = block.captures(text).and_then(|c| c.get(2)) else {
        return Vec::new();
    };
    body.as_str()
        .trim()
        .lines()
        .map(|l| l.trim_matches(|c: char| matches!(c, ' ' | '-' | '\u{2022}' | '*' | '\t')))
        .filter(|l| !l.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive whole-word pattern. Terms ending in a symbol (`C++`)
/// cannot use a trailing `\b`, so they end at a non-word char or end of text.
fn vocabulary_pattern(term: &str) -> Regex {
    let ends_with_word_char = term
        .chars()
        .last()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false);
    let tail = if ends_with_word_char { r"\b" } else { r"(?:\W|$)" };
    Regex::new(&format!(r"(?i)\b{}{tail}", regex::escape(term)))
        .expect("escaped vocabulary term is a valid regex")
}
