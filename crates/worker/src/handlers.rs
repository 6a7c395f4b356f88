#![forbid(unsafe_code)]

use crate::runtime::JobHandler;
use cg_core::ids::{ConversationId, MessageId};
use cg_pipeline::{Extractor, Validator};
use cg_storage::{JobRow, SqliteStore};
use serde_json::Value;

fn payload_field(job: &JobRow, field: &str) -> Result<String, String> {
    let parsed: Value = serde_json::from_str(&job.payload)
        .map_err(|err| format!("payload is not valid JSON: {err}"))?;
    parsed
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("payload missing field {field}"))
}

/// Handles `sanitize_async` jobs (spec.md §4.6): re-validates the already
/// fast-sanitized message content and records residual issues.
pub(crate) struct SanitizeHandler {
    pub(crate) validator: Box<dyn Validator>,
}

impl JobHandler for SanitizeHandler {
    fn handle(&self, store: &mut SqliteStore, job: &JobRow) -> Result<(), String> {
        let message_id = payload_field(job, "messageId")?;
        let message_id = MessageId::try_new(message_id).map_err(|err| err.to_string())?;

        let message = store
            .message_get(&message_id)
            .map_err(|err| err.to_string())?
            .ok_or_else(|| "message not found".to_string())?;

        let outcome = self
            .validator
            .validate(&message.content)
            .map_err(|err| err.to_string())?;

        if !outcome.is_clean {
            store
                .sanitization_log_append(&message_id, &outcome.issues)
                .map_err(|err| err.to_string())?;
        }

        Ok(())
    }
}

/// Handles `extract_learning_ai` jobs (spec.md §4.7): scans a conversation's
/// messages for a reusable learning and appends one if found. Never
/// deduplicates against prior extractions for the same conversation.
pub(crate) struct ExtractHandler {
    pub(crate) extractor: Box<dyn Extractor>,
}

impl JobHandler for ExtractHandler {
    fn handle(&self, store: &mut SqliteStore, job: &JobRow) -> Result<(), String> {
        let conversation_id = payload_field(job, "conversationId")?;
        let conversation_id =
            ConversationId::try_new(conversation_id).map_err(|err| err.to_string())?;

        let messages = store
            .messages_list_by_conversation(&conversation_id)
            .map_err(|err| err.to_string())?;

        let draft = self
            .extractor
            .extract(&messages)
            .map_err(|err| err.to_string())?;

        if let Some(draft) = draft {
            store
                .learning_append(&conversation_id, &draft.category, &draft.title, &draft.content)
                .map_err(|err| err.to_string())?;
        }

        Ok(())
    }
}
