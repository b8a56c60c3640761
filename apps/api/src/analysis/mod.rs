// Résumé analysis core.
// LLM extraction and critique with output recovery, plus the heuristic
// extractor and scorer used whenever the LLM path fails.

pub mod heuristics;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod recovery;
pub mod scoring;
pub mod service;

pub use service::ResumeAnalyzer;
