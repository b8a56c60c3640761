//! Heuristic critique: deterministic rating, advice and upskill suggestions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{Critique, ResumeFields, UpskillSuggestion};

const BASE_SCORE: i32 = 4;
const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 10;
const SUMMARY_MIN_CHARS: usize = 30;
const BROAD_SKILL_COUNT: usize = 3;
const MAX_UPSKILL_SUGGESTIONS: usize = 3;

/// Skills suggested, in order, when the candidate does not list them.
const UPSKILL_CANDIDATES: &[&str] = &["Docker", "SQL", "AWS", "TypeScript", "Git"];

const CONTACT_ADVICE: &str = "Add clear contact information (email & phone) at the top.";
const EXPERIENCE_ADVICE: &str =
    "Add at least one work experience entry with dates and measurable results.";
const QUANTIFY_ADVICE: &str = "Quantify achievements in work experience (use numbers/metrics).";
const SKILLS_ADVICE: &str = "List more technical skills and specify proficiency where possible.";
const GENERIC_ADVICE: &str = "Resume is fine; consider formatting and concise bullets.";

static METRIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+%?").expect("valid metric regex"));

/// Rating in [1, 10]. Base 4; summary +1; skills +1/+2; experience +2; education +1.
pub fn score(fields: &ResumeFields) -> u8 {
    let mut score = BASE_SCORE;

    let summary_len = fields
        .summary
        .as_deref()
        .map(|s| s.chars().count())
        .unwrap_or(0);
    if summary_len > SUMMARY_MIN_CHARS {
        score += 1;
    }

    score += match fields.core_skills.len() {
        n if n >= BROAD_SKILL_COUNT => 2,
        n if n >= 1 => 1,
        _ => 0,
    };

    if !fields.work_experience.is_empty() {
        score += 2;
    }
    if !fields.education.is_empty() {
        score += 1;
    }

    clamp_rating(score)
}

pub fn clamp_rating(score: i32) -> u8 {
    score.clamp(MIN_RATING, MAX_RATING) as u8
}

/// Ordered improvement advice, joined into one paragraph.
pub fn improvement_areas(fields: &ResumeFields) -> String {
    let mut advice = Vec::new();

    if is_blank(&fields.email) || is_blank(&fields.phone) {
        advice.push(CONTACT_ADVICE);
    }

    if fields.work_experience.is_empty() {
        advice.push(EXPERIENCE_ADVICE);
    } else if !fields
        .work_experience
        .iter()
        .any(|entry| METRIC.is_match(&entry.description))
    {
        advice.push(QUANTIFY_ADVICE);
    }

    if fields.core_skills.len() < BROAD_SKILL_COUNT {
        advice.push(SKILLS_ADVICE);
    }

    if advice.is_empty() {
        advice.push(GENERIC_ADVICE);
    }

    advice.join(" ")
}

/// Up to three common skills the candidate does not already list.
pub fn upskill_suggestions(fields: &ResumeFields) -> Vec<UpskillSuggestion> {
    let present: Vec<String> = fields
        .core_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    UPSKILL_CANDIDATES
        .iter()
        .filter(|candidate| !present.contains(&candidate.to_lowercase()))
        .take(MAX_UPSKILL_SUGGESTIONS)
        .map(|skill| UpskillSuggestion {
            skill: (*skill).to_string(),
            why: format!("Commonly required for modern full-stack roles ({skill})."),
        })
        .collect()
}

/// Full heuristic critique of the given fields.
pub fn critique(fields: &ResumeFields) -> Critique {
    Critique {
        resume_rating: score(fields),
        improvement_areas: improvement_areas(fields),
        upskill_suggestions: upskill_suggestions(fields),
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{Education, WorkExperience};

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn job(description: &str) -> WorkExperience {
        WorkExperience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            description: description.to_string(),
        }
    }

    fn degree() -> Education {
        Education {
            degree: "BSc".to_string(),
            institution: "MIT".to_string(),
            year: "2012".to_string(),
        }
    }

    #[test]
    fn test_empty_resume_scores_base() {
        assert_eq!(score(&ResumeFields::default()), 4);
    }

    #[test]
    fn test_three_skills_and_one_job_scores_eight() {
        let fields = ResumeFields {
            core_skills: skills(&["Rust", "Go", "SQL"]),
            work_experience: vec![job("Built things")],
            ..Default::default()
        };
        assert_eq!(score(&fields), 8);
    }

    #[test]
    fn test_complete_resume_scores_ten() {
        let fields = ResumeFields {
            summary: Some("Backend engineer focused on distributed payment systems.".to_string()),
            core_skills: skills(&["Rust", "Go", "SQL"]),
            work_experience: vec![job("Cut costs by 30%")],
            education: vec![degree()],
            ..Default::default()
        };
        assert_eq!(score(&fields), 10);
    }

    #[test]
    fn test_short_summary_earns_nothing() {
        let fields = ResumeFields {
            summary: Some("Engineer.".to_string()),
            ..Default::default()
        };
        assert_eq!(score(&fields), 4);
    }

    #[test]
    fn test_score_is_monotonic_in_counts() {
        let mut fields = ResumeFields::default();
        let mut previous = score(&fields);
        for skill in ["Rust", "Go", "SQL", "Kafka"] {
            fields.core_skills.push(skill.to_string());
            let next = score(&fields);
            assert!(next >= previous);
            previous = next;
        }
        for _ in 0..3 {
            fields.work_experience.push(job("x"));
            fields.education.push(degree());
            let next = score(&fields);
            assert!(next >= previous && next <= 10);
            previous = next;
        }
    }

    #[test]
    fn test_clamp_rating_bounds() {
        assert_eq!(clamp_rating(-5), 1);
        assert_eq!(clamp_rating(0), 1);
        assert_eq!(clamp_rating(7), 7);
        assert_eq!(clamp_rating(42), 10);
    }

    #[test]
    fn test_improvement_areas_for_empty_resume() {
        let advice = improvement_areas(&ResumeFields::default());
        assert_eq!(
            advice,
            format!("{CONTACT_ADVICE} {EXPERIENCE_ADVICE} {SKILLS_ADVICE}")
        );
    }

    #[test]
    fn test_improvement_areas_asks_to_quantify() {
        let fields = ResumeFields {
            email: Some("a@b.com".to_string()),
            phone: Some("555 0100".to_string()),
            core_skills: skills(&["Rust", "Go", "SQL"]),
            work_experience: vec![job("Led the platform team")],
            ..Default::default()
        };
        assert_eq!(improvement_areas(&fields), QUANTIFY_ADVICE);
    }

    #[test]
    fn test_improvement_areas_generic_when_nothing_missing() {
        let fields = ResumeFields {
            email: Some("a@b.com".to_string()),
            phone: Some("555 0100".to_string()),
            core_skills: skills(&["Rust", "Go", "SQL"]),
            work_experience: vec![job("Grew revenue 25%")],
            ..Default::default()
        };
        assert_eq!(improvement_areas(&fields), GENERIC_ADVICE);
    }

    #[test]
    fn test_upskill_skips_present_skills_case_insensitively() {
        let fields = ResumeFields {
            core_skills: skills(&["docker", "Sql"]),
            ..Default::default()
        };
        let suggestions = upskill_suggestions(&fields);
        let names: Vec<&str> = suggestions.iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(names, vec!["AWS", "TypeScript", "Git"]);
        assert!(suggestions[0].why.contains("AWS"));
    }

    #[test]
    fn test_upskill_at_most_three() {
        assert_eq!(upskill_suggestions(&ResumeFields::default()).len(), 3);
    }

    #[test]
    fn test_critique_combines_parts() {
        let critique = critique(&ResumeFields::default());
        assert_eq!(critique.resume_rating, 4);
        assert_eq!(critique.upskill_suggestions[0].skill, "Docker");
        assert!(critique.improvement_areas.starts_with(CONTACT_ADVICE));
    }
}
