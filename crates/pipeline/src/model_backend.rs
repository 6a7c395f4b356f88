#![forbid(unsafe_code)]

//! Thin blocking HTTP wrapper around the Anthropic Messages API, shared by
//! the validator and extractor's model-backed implementations. One `ureq`
//! agent per backend instance, 30s timeout per spec.md §5.

use crate::PipelineError;
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ModelBackend {
    api_key: String,
    endpoint: String,
    model: String,
    agent: ureq::Agent,
}

impl ModelBackend {
    pub fn new(api_key: String) -> Self {
        let endpoint =
            std::env::var("CONTEXTGUARD_MODEL_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model =
            std::env::var("CONTEXTGUARD_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        let agent = ureq::Agent::new_with_config(config);
        Self {
            api_key,
            endpoint,
            model,
            agent,
        }
    }

    /// Sends a single-turn prompt with temperature 0 and returns the raw
    /// text of the first content block. Callers parse that text as JSON
    /// themselves since the two call sites expect different shapes.
    pub fn complete(&self, system: &str, user: &str) -> Result<String, PipelineError> {
        let body = json!({
            "model": self.model,
            "max_tokens": 1024,
            "temperature": 0,
            "system": system,
            "messages": [{ "role": "user", "content": user }],
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|err| PipelineError::Transport(err.to_string()))?;

        let parsed: Value = response
            .into_body()
            .read_json()
            .map_err(|err| PipelineError::Transport(err.to_string()))?;

        parsed
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.get("text"))
            .and_then(|text| text.as_str())
            .map(str::to_string)
            .ok_or_else(|| PipelineError::Malformed("missing content[0].text".to_string()))
    }
}
