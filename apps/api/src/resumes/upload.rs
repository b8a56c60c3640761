//! Upload pipeline: validate → extract text → LLM/heuristic analysis → persist.
//!
//! Runs synchronously per request. Only an unsupported upload, an unreadable
//! PDF or a storage failure reach the caller; analysis failures are absorbed
//! by the analyzer's heuristic fallback.

use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::heuristics::{extract_email, extract_phone};
use crate::analysis::models::{CritiqueResult, StructuredResume};
use crate::analysis::ResumeAnalyzer;
use crate::errors::AppError;
use crate::resumes::pdf;
use crate::resumes::store::{NewResume, ResumeStore};

const NAME_MAX_TOKENS: usize = 4;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub structured: StructuredResume,
    pub critique: CritiqueResult,
}

/// Contact columns denormalized onto the stored record.
#[derive(Debug, Default, PartialEq)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Rejects anything without a `.pdf` extension (case-insensitive).
pub fn ensure_pdf(filename: &str) -> Result<(), AppError> {
    let is_pdf = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        Ok(())
    } else {
        Err(AppError::UnsupportedFormat(format!(
            "Only PDF uploads are supported, got '{filename}'"
        )))
    }
}

/// Full pipeline for one uploaded file.
pub async fn process_upload(
    filename: &str,
    bytes: Bytes,
    analyzer: &ResumeAnalyzer,
    store: &dyn ResumeStore,
) -> Result<UploadResponse, AppError> {
    ensure_pdf(filename)?;

    let text = pdf::extract_text(bytes).await?;
    info!("Extracted {} characters from {filename}", text.len());

    analyze_and_store(filename, &text, analyzer, store).await
}

/// Analysis and persistence for already-extracted document text.
pub async fn analyze_and_store(
    filename: &str,
    text: &str,
    analyzer: &ResumeAnalyzer,
    store: &dyn ResumeStore,
) -> Result<UploadResponse, AppError> {
    let contact = contact_details(text);

    let structured = analyzer.extract(text).await;
    let critique = analyzer.critique(&structured.data).await;

    let id = store
        .save(NewResume {
            filename: filename.to_string(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            structured: serde_json::to_value(&structured)
                .context("Failed to encode structured resume")?,
            critique: serde_json::to_value(&critique).context("Failed to encode critique")?,
        })
        .await?;

    info!(
        "Processed {filename} as {id} (extraction: {}, critique: {})",
        structured.provenance.source(),
        critique.provenance.source()
    );

    Ok(UploadResponse {
        id,
        filename: filename.to_string(),
        name: contact.name,
        email: contact.email,
        phone: contact.phone,
        structured,
        critique,
    })
}

/// Quick contact scan: the first non-blank line is the name if it has no
/// `@` and at most four words; email and phone are the first regex hits.
pub fn contact_details(text: &str) -> ContactDetails {
    let name = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .filter(|l| !l.contains('@') && l.split_whitespace().count() <= NAME_MAX_TOKENS)
        .map(str::to_string);

    ContactDetails {
        name,
        email: extract_email(text),
        phone: extract_phone(text),
    }
}
