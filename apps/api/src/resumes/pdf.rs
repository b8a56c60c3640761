//! PDF text extraction.

use bytes::Bytes;

use crate::errors::AppError;

/// Extracts linear text from PDF bytes: page texts joined by newlines,
/// pages without text dropped.
///
/// Parsing is CPU-bound and the parser can panic on malformed files, so it
/// runs on the blocking pool and a panic is reported like any parse error.
pub async fn extract_text(bytes: Bytes) -> Result<String, AppError> {
    let pages =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
            .await
            .map_err(|e| AppError::UnprocessableEntity(format!("PDF parser crashed: {e}")))?
            .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;

    Ok(join_pages(&pages))
}

pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
