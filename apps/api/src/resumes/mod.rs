// Résumé uploads: PDF text extraction, the upload pipeline, persistence
// and the HTTP handlers that expose them.

pub mod handlers;
pub mod pdf;
pub mod store;
pub mod upload;
