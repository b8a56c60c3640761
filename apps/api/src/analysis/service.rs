//! Résumé analysis: orchestrates the LLM path and the heuristic fallback.
//!
//! Flow per operation: prompt → gateway → recover JSON → normalize.
//! Any failure along the way (no key, HTTP error, unrecoverable output,
//! unusable critique) switches to the heuristic component. Neither entry
//! point can fail; the result is tagged with its provenance.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::models::{
    Critique, CritiqueResult, Provenance, ResumeFields, Sourced, StructuredResume,
};
use crate::analysis::prompts::{CRITIQUE_PROMPT, EXTRACTION_PROMPT};
use crate::analysis::recovery::{recover, RecoveryError};
use crate::analysis::{heuristics, normalize, scoring};
use crate::llm_client::{LlmError, LlmGateway};

/// Reasons the LLM path was abandoned. Never surfaced to API callers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM gateway unavailable: {0}")]
    GatewayUnavailable(#[from] LlmError),

    #[error("LLM output unrecoverable: {0}")]
    RecoveryFailed(#[from] RecoveryError),

    #[error("LLM critique has no usable resume_rating")]
    IncompleteCritique,

    #[error("could not encode resume fields: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    llm: Arc<dyn LlmGateway>,
}

impl ResumeAnalyzer {
    pub fn new(llm: Arc<dyn LlmGateway>) -> Self {
        Self { llm }
    }

    /// Structured candidate data from raw document text.
    pub async fn extract(&self, raw_text: &str) -> StructuredResume {
        match self.extract_with_llm(raw_text).await {
            Ok((data, llm_raw)) => {
                info!("Resume fields extracted by LLM");
                Sourced {
                    data,
                    provenance: Provenance::Llm { llm_raw },
                }
            }
            Err(e) => {
                warn!(error = %e, "LLM extraction failed, falling back to heuristic extractor");
                Sourced {
                    data: heuristics::extract_fields(raw_text),
                    provenance: Provenance::Heuristic {
                        llm_error: e.to_string(),
                    },
                }
            }
        }
    }

    /// Rating, advice and upskill suggestions for already-extracted fields.
    pub async fn critique(&self, fields: &ResumeFields) -> CritiqueResult {
        match self.critique_with_llm(fields).await {
            Ok((data, llm_raw)) => {
                info!(rating = data.resume_rating, "Resume critiqued by LLM");
                Sourced {
                    data,
                    provenance: Provenance::Llm { llm_raw },
                }
            }
            Err(e) => {
                warn!(error = %e, "LLM critique failed, falling back to heuristic scorer");
                Sourced {
                    data: scoring::critique(fields),
                    provenance: Provenance::Heuristic {
                        llm_error: e.to_string(),
                    },
                }
            }
        }
    }

    async fn extract_with_llm(
        &self,
        raw_text: &str,
    ) -> Result<(ResumeFields, String), AnalysisError> {
        let prompt = EXTRACTION_PROMPT.replace("{resume_text}", raw_text);
        let raw = self.llm.generate(&prompt).await?;
        debug!("LLM raw extraction output: {raw}");

        let object = recover(&raw)?;
        Ok((normalize::resume_fields(&object), raw))
    }

    async fn critique_with_llm(
        &self,
        fields: &ResumeFields,
    ) -> Result<(Critique, String), AnalysisError> {
        let resume_json = serde_json::to_string(fields)?;
        let prompt = CRITIQUE_PROMPT.replace("{resume_json}", &resume_json);
        let raw = self.llm.generate(&prompt).await?;
        debug!("LLM raw critique output: {raw}");

        let object = recover(&raw)?;
        let critique = normalize::critique(&object).ok_or(AnalysisError::IncompleteCritique)?;
        Ok((critique, raw))
    }
}
