#![forbid(unsafe_code)]

use crate::model_backend::ModelBackend;
use crate::PipelineError;
use cg_storage::MessageRow;
use serde_json::Value;

const SYSTEM_PROMPT: &str = "You read an already-sanitized developer conversation and decide \
whether it contains one reusable \"learning\" worth keeping: a technique, a gotcha, a useful \
snippet. If so reply with a single JSON object shaped exactly as {\"category\": string, \
\"title\": string, \"content\": string}. If there is nothing worth keeping, reply with exactly \
{\"category\": null, \"title\": null, \"content\": null}.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearningDraft {
    pub category: String,
    pub title: String,
    pub content: String,
}

/// Derives a candidate `Learning` from a conversation's messages
/// (spec.md §4.7). Never deduplicates against prior extractions — repeat
/// runs over the same conversation are expected to produce repeat rows.
pub trait Extractor: Send + Sync {
    fn extract(&self, messages: &[MessageRow]) -> Result<Option<LearningDraft>, PipelineError>;
}

pub struct ExternalModelExtractor {
    backend: ModelBackend,
}

impl ExternalModelExtractor {
    pub fn new(api_key: String) -> Self {
        Self {
            backend: ModelBackend::new(api_key),
        }
    }
}

impl Extractor for ExternalModelExtractor {
    fn extract(&self, messages: &[MessageRow]) -> Result<Option<LearningDraft>, PipelineError> {
        let transcript = messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str(), m.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let raw = self.backend.complete(SYSTEM_PROMPT, &transcript)?;
        let parsed: Value = serde_json::from_str(raw.trim())
            .map_err(|err| PipelineError::Malformed(err.to_string()))?;

        if parsed.get("category").map(Value::is_null).unwrap_or(true) {
            return Ok(None);
        }

        let category = parsed
            .get("category")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::Malformed("missing category".to_string()))?
            .to_string();
        let title = parsed
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::Malformed("missing title".to_string()))?
            .to_string();
        let content = parsed
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::Malformed("missing content".to_string()))?
            .to_string();

        Ok(Some(LearningDraft {
            category,
            title,
            content,
        }))
    }
}

const FENCE: &str = "```";

/// Deterministic fallback (spec.md §4.7 budgets: 50ms heuristic): the first
/// assistant message containing a fenced code block becomes a "technical"
/// learning titled "Code sample", content is the block body.
pub struct HeuristicExtractor;

impl Extractor for HeuristicExtractor {
    fn extract(&self, messages: &[MessageRow]) -> Result<Option<LearningDraft>, PipelineError> {
        for message in messages {
            if !matches!(message.role, cg_core::model::Role::Assistant) {
                continue;
            }
            if let Some(block) = first_fenced_block(&message.content) {
                return Ok(Some(LearningDraft {
                    category: "technical".to_string(),
                    title: "Code sample".to_string(),
                    content: block,
                }));
            }
        }
        Ok(None)
    }
}

fn first_fenced_block(text: &str) -> Option<String> {
    let start = text.find(FENCE)?;
    let after_open = start + FENCE.len();
    let body_start = text[after_open..].find('\n').map(|i| after_open + i + 1)?;
    let end = text[body_start..].find(FENCE)?;
    Some(text[body_start..body_start + end].trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::ids::{ConversationId, MessageId};
    use cg_core::model::Role;

    fn message(role: Role, content: &str) -> MessageRow {
        MessageRow {
            id: MessageId::generate(),
            conversation_id: ConversationId::generate(),
            role,
            content: content.to_string(),
            sequence: 1,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn extracts_first_fenced_block_from_assistant_message() {
        let messages = vec![
            message(Role::User, "how do I reverse a vec in rust?"),
            message(
                Role::Assistant,
                "Use `.rev()`:\n```rust\nlet r: Vec<_> = v.into_iter().rev().collect();\n```\ndone.",
            ),
        ];
        let draft = HeuristicExtractor.extract(&messages).unwrap().unwrap();
        assert_eq!(draft.category, "technical");
        assert_eq!(draft.title, "Code sample");
        assert!(draft.content.contains("into_iter().rev()"));
    }

    #[test]
    fn no_code_block_yields_no_learning() {
        let messages = vec![
            message(Role::User, "what's the weather like"),
            message(Role::Assistant, "I don't have access to that."),
        ];
        assert!(HeuristicExtractor.extract(&messages).unwrap().is_none());
    }

    #[test]
    fn repeated_extraction_is_not_deduplicated_by_the_extractor_itself() {
        let messages = vec![message(Role::Assistant, "```js\nconsole.log(1)\n```")];
        let first = HeuristicExtractor.extract(&messages).unwrap().unwrap();
        let second = HeuristicExtractor.extract(&messages).unwrap().unwrap();
        assert_eq!(first, second);
    }
}
