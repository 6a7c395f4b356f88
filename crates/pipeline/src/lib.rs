#![forbid(unsafe_code)]

pub mod extractor;
pub mod model_backend;
pub mod validator;

use std::fmt;

/// Failure taxonomy for the two model-backed stages (spec.md §7): transport
/// problems talking to the configured endpoint, and malformed responses that
/// parsed as JSON but not into the expected shape. Both funnel through
/// `JobQueue::fail` in the worker, never panic the process.
#[derive(Debug)]
pub enum PipelineError {
    Transport(String),
    Malformed(String),
}

impl PipelineError {
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Transport(_) => "TRANSPORT",
            PipelineError::Malformed(_) => "MALFORMED_RESPONSE",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Transport(message) => write!(f, "transport: {message}"),
            PipelineError::Malformed(message) => write!(f, "malformed response: {message}"),
        }
    }
}

impl std::error::Error for PipelineError {}

pub use extractor::{Extractor, ExternalModelExtractor, HeuristicExtractor, LearningDraft};
pub use validator::{ExternalModelValidator, LocalHeuristicValidator, ValidationOutcome, Validator};

/// Picks the heuristic backend unless an API key is configured, per
/// spec.md §9 "Optional model backend" and SPEC_FULL.md §4.6.
pub fn build_validator(api_key: Option<String>) -> Box<dyn Validator> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Box::new(ExternalModelValidator::new(key)),
        _ => Box::new(LocalHeuristicValidator),
    }
}

/// Picks the heuristic backend unless an API key is configured, per
/// spec.md §9 and SPEC_FULL.md §4.7.
pub fn build_extractor(api_key: Option<String>) -> Box<dyn Extractor> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Box::new(ExternalModelExtractor::new(key)),
        _ => Box::new(HeuristicExtractor),
    }
}
