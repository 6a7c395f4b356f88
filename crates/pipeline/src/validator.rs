#![forbid(unsafe_code)]

use crate::model_backend::ModelBackend;
use crate::PipelineError;
use serde_json::Value;

const SYSTEM_PROMPT: &str = "You audit already-sanitized developer conversation text for any \
personally identifying information the fast sanitizer missed. Reply with a single JSON object \
shaped exactly as {\"is_clean\": bool, \"issues\": [string, ...]} and nothing else.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_clean: bool,
    pub issues: Vec<String>,
}

/// Re-checks already-sanitized text for PII the fast sanitizer missed
/// (spec.md §4.6). Two implementations, selected by whether an
/// `ANTHROPIC_API_KEY` is configured.
pub trait Validator: Send + Sync {
    fn validate(&self, sanitized_text: &str) -> Result<ValidationOutcome, PipelineError>;
}

pub struct ExternalModelValidator {
    backend: ModelBackend,
}

impl ExternalModelValidator {
    pub fn new(api_key: String) -> Self {
        Self {
            backend: ModelBackend::new(api_key),
        }
    }
}

impl Validator for ExternalModelValidator {
    fn validate(&self, sanitized_text: &str) -> Result<ValidationOutcome, PipelineError> {
        let raw = self.backend.complete(SYSTEM_PROMPT, sanitized_text)?;
        let parsed: Value = serde_json::from_str(raw.trim())
            .map_err(|err| PipelineError::Malformed(err.to_string()))?;

        let is_clean = parsed
            .get("is_clean")
            .and_then(Value::as_bool)
            .ok_or_else(|| PipelineError::Malformed("missing is_clean".to_string()))?;
        let issues = parsed
            .get("issues")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ValidationOutcome { is_clean, issues })
    }
}

/// Deterministic fallback used whenever no model credential is configured
/// (spec.md §4.6 "Heuristic fallback") — keeps CI and offline use hermetic.
/// Re-applies the email/phone/ip/path subset of the pattern catalog to text
/// that has already passed through the fast sanitizer once.
pub struct LocalHeuristicValidator;

impl Validator for LocalHeuristicValidator {
    fn validate(&self, sanitized_text: &str) -> Result<ValidationOutcome, PipelineError> {
        let survivors = cg_patterns::heuristic_survivors(sanitized_text);
        let issues = survivors
            .iter()
            .map(|m| format!("{} pattern still present after sanitization", m.category))
            .collect::<Vec<_>>();
        Ok(ValidationOutcome {
            is_clean: issues.is_empty(),
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_validator_flags_survivors() {
        let validator = LocalHeuristicValidator;
        let outcome = validator
            .validate("contact me at leaked@example.com please")
            .unwrap();
        assert!(!outcome.is_clean);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn heuristic_validator_passes_clean_text() {
        let validator = LocalHeuristicValidator;
        let outcome = validator
            .validate("the sanitizer already replaced this with [REDACTED_EMAIL]")
            .unwrap();
        assert!(outcome.is_clean);
        assert!(outcome.issues.is_empty());
    }
}
