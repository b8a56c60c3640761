use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend. `PgResumeStore` in production.
    pub store: Arc<dyn ResumeStore>,
    /// LLM extraction and critique with heuristic fallback.
    pub analyzer: ResumeAnalyzer,
    pub config: Config,
}
