use serde::{Deserialize, Serialize};

/// Candidate fields extracted from a résumé, whichever path produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub core_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// Qualitative assessment of a résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    /// Always within [1, 10].
    pub resume_rating: u8,
    pub improvement_areas: String,
    pub upskill_suggestions: Vec<UpskillSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpskillSuggestion {
    pub skill: String,
    pub why: String,
}

/// Where a result came from. A heuristic result always carries the error
/// that forced the fallback; an LLM result keeps the raw response for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    Llm { llm_raw: String },
    Heuristic { llm_error: String },
}

impl Provenance {
    pub fn source(&self) -> &'static str {
        match self {
            Provenance::Llm { .. } => "llm",
            Provenance::Heuristic { .. } => "heuristic",
        }
    }
}

/// A payload tagged with its provenance. Serializes flat:
/// `{ ...data, "source": "...", "llm_raw" | "llm_error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(flatten)]
    pub provenance: Provenance,
}

pub type StructuredResume = Sourced<ResumeFields>;
pub type CritiqueResult = Sourced<Critique>;
