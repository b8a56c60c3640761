//! Maps recovered LLM objects onto the internal résumé and critique schema.
//!
//! The prompts and the internal schema differ (`technical_skills` vs
//! `core_skills`, `graduation_year` vs `year`, plain-string upskill lists),
//! and models drift from the requested shape, so every field is read leniently.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::analysis::models::{Critique, Education, ResumeFields, UpskillSuggestion, WorkExperience};
use crate::analysis::recovery::JsonObject;
use crate::analysis::scoring::clamp_rating;

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

pub fn resume_fields(object: &JsonObject) -> ResumeFields {
    ResumeFields {
        name: text(object, &["name", "full_name"]),
        email: text(object, &["email"]),
        phone: text(object, &["phone", "phone_number"]),
        linkedin_url: text(object, &["linkedin_url", "linkedin"]),
        portfolio_url: text(object, &["portfolio_url", "portfolio", "website"]),
        core_skills: field(object, &["core_skills", "technical_skills", "skills"])
            .map(string_list)
            .unwrap_or_default(),
        soft_skills: field(object, &["soft_skills"])
            .map(string_list)
            .unwrap_or_default(),
        work_experience: field(object, &["work_experience", "experience"])
            .map(|v| items(v).filter_map(work_experience).collect())
            .unwrap_or_default(),
        education: field(object, &["education"])
            .map(|v| items(v).filter_map(education).collect())
            .unwrap_or_default(),
        summary: text(object, &["summary"]),
    }
}

/// `None` when the object has no usable `resume_rating`.
pub fn critique(object: &JsonObject) -> Option<Critique> {
    let resume_rating = field(object, &["resume_rating", "rating", "score"]).and_then(rating)?;

    let improvement_areas = match field(object, &["improvement_areas"]) {
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(" "),
        Some(value) => scalar_text(value).unwrap_or_default(),
        None => String::new(),
    };

    let upskill_suggestions = field(object, &["upskill_suggestions"])
        .map(|v| items(v).filter_map(upskill).collect())
        .unwrap_or_default();

    Some(Critique {
        resume_rating,
        improvement_areas,
        upskill_suggestions,
    })
}

/// First key present with a non-null value.
fn field<'a>(object: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| object.get(*k))
        .find(|v| !v.is_null())
}

fn text(object: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| object.get(*k))
        .find_map(scalar_text)
}

/// Non-empty trimmed text for strings, numbers and booleans.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Iterates array elements, or treats a lone value as a one-element list.
fn items(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(values) => Box::new(values.iter()),
        other => Box::new(std::iter::once(other)),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => items(other)
            .filter_map(|item| match item {
                Value::Object(o) => text(o, &["name", "skill"]),
                scalar => scalar_text(scalar),
            })
            .collect(),
    }
}

fn work_experience(value: &Value) -> Option<WorkExperience> {
    match value {
        Value::Object(o) => Some(WorkExperience {
            title: text(o, &["title", "role", "position"]).unwrap_or_default(),
            company: text(o, &["company", "organization", "employer"]).unwrap_or_default(),
            description: text(o, &["description", "details", "summary"]).unwrap_or_default(),
        }),
        scalar => scalar_text(scalar).map(|line| WorkExperience {
            title: line.clone(),
            company: String::new(),
            description: line,
        }),
    }
}

fn education(value: &Value) -> Option<Education> {
    match value {
        Value::Object(o) => Some(Education {
            degree: text(o, &["degree", "qualification"]).unwrap_or_default(),
            institution: text(o, &["institution", "school", "university"]).unwrap_or_default(),
            year: text(o, &["year", "graduation_year"]).unwrap_or_default(),
        }),
        scalar => scalar_text(scalar).map(|degree| Education {
            degree,
            ..Default::default()
        }),
    }
}

/// Accepts `7`, `7.6`, `"7"` or `"7/10"`; always clamped to [1, 10].
fn rating(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => LEADING_NUMBER.find(s)?.as_str().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(clamp_rating(number.round() as i32))
}

fn upskill(value: &Value) -> Option<UpskillSuggestion> {
    match value {
        Value::Object(o) => Some(UpskillSuggestion {
            skill: text(o, &["skill", "name"])?,
            why: text(o, &["why", "reason", "explanation", "description"]).unwrap_or_default(),
        }),
        scalar => {
            let line = scalar_text(scalar)?;
            let (skill, why) = line
                .split_once(':')
                .or_else(|| line.split_once(" - "))
                .map(|(skill, why)| (skill.trim().to_string(), why.trim().to_string()))
                .unwrap_or_else(|| (line.clone(), String::new()));
            (!skill.is_empty()).then_some(UpskillSuggestion { skill, why })
        }
    }
}
