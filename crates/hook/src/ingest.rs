#![forbid(unsafe_code)]

use crate::patterns_inline;
use cg_core::model::{JobType, Role};
use cg_storage::SqliteStore;
use serde::Deserialize;
use serde_json::json;
use std::fmt;

/// Hard ceiling on one event's raw input size (spec.md §7 "oversize
/// payload"). A single lifecycle event is a handful of KiB of text; 1 MiB
/// is generous headroom while still bounding worst-case hook latency.
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
pub(crate) enum HookError {
    OversizePayload { bytes: usize },
    InvalidEncoding,
    InvalidInput(String),
    Store(cg_storage::StoreError),
}

impl HookError {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            HookError::OversizePayload { .. } => "OVERSIZE_PAYLOAD",
            HookError::InvalidEncoding => "INVALID_ENCODING",
            HookError::InvalidInput(_) => "INVALID_INPUT",
            HookError::Store(_) => "STORE_ERROR",
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::OversizePayload { bytes } => {
                write!(f, "oversize payload ({bytes} bytes)")
            }
            HookError::InvalidEncoding => write!(f, "input is not valid UTF-8"),
            HookError::InvalidInput(message) => write!(f, "invalid input: {message}"),
            HookError::Store(err) => write!(f, "storage: {err}"),
        }
    }
}

impl std::error::Error for HookError {}

impl From<cg_storage::StoreError> for HookError {
    fn from(value: cg_storage::StoreError) -> Self {
        HookError::Store(value)
    }
}

#[derive(Debug, Deserialize)]
struct HookEvent {
    #[serde(default)]
    #[allow(dead_code)]
    r#type: Option<String>,
    role: String,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    timestamp: Option<String>,
}

/// Runs the full ingest contract (spec.md §4.3): resolve conversation,
/// sanitize, insert one message row, enqueue `sanitize_async` and — for
/// assistant-role messages — `extract_learning_ai`.
pub(crate) fn ingest(store: &mut SqliteStore, raw: &[u8]) -> Result<(), HookError> {
    if raw.len() > MAX_PAYLOAD_BYTES {
        return Err(HookError::OversizePayload { bytes: raw.len() });
    }

    let text = std::str::from_utf8(raw).map_err(|_| HookError::InvalidEncoding)?;
    let event: HookEvent =
        serde_json::from_str(text).map_err(|err| HookError::InvalidInput(err.to_string()))?;

    let role = Role::from_str(&event.role)
        .ok_or_else(|| HookError::InvalidInput(format!("unknown role: {}", event.role)))?;

    let raw_content = match role {
        Role::User => event.prompt.as_deref(),
        Role::Assistant => event.content.as_deref(),
    }
    .ok_or_else(|| HookError::InvalidInput("missing prompt/content for role".to_string()))?;

    let conversation_id = match event.conversation_id {
        Some(id) => {
            let id = cg_core::ids::ConversationId::try_new(id)
                .map_err(|err| HookError::InvalidInput(err.to_string()))?;
            store
                .conversation_get(&id)?
                .ok_or_else(|| HookError::InvalidInput("unknown conversation_id".to_string()))?
                .id
        }
        None => store.conversation_resolve(event.session_id.as_deref())?.id,
    };

    let sanitized = patterns_inline::sanitize(raw_content);
    if sanitized.redaction_count > 0 {
        tracing::info!(
            conversation_id = conversation_id.as_str(),
            redaction_count = sanitized.redaction_count,
            catalog_version = patterns_inline::CATALOG_VERSION,
            "fast sanitizer redacted content before persistence"
        );
    }

    let message = store.message_insert(&conversation_id, role, &sanitized.sanitized)?;

    store.job_enqueue(
        JobType::SanitizeAsync,
        &json!({ "messageId": message.id.as_str() }),
    )?;

    if matches!(role, Role::Assistant) {
        store.job_enqueue(
            JobType::ExtractLearningAi,
            &json!({ "conversationId": conversation_id.as_str() }),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::model::JobType as CoreJobType;

    fn open_tmp() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("context.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn user_event_inserts_sanitized_message_and_enqueues_one_job() {
        let (_dir, mut store) = open_tmp();
        let raw = br#"{"type":"UserPromptSubmit","role":"user","prompt":"hi, reach me at a@example.com","session_id":"S1"}"#;
        ingest(&mut store, raw).unwrap();

        let conv = store.conversation_resolve(Some("S1")).unwrap();
        let messages = store.messages_list_by_conversation(&conv.id).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("[REDACTED_EMAIL]"));
        assert!(!messages[0].content.contains("a@example.com"));

        assert!(store.job_claim(CoreJobType::SanitizeAsync).unwrap().is_some());
        assert!(store.job_claim(CoreJobType::ExtractLearningAi).unwrap().is_none());
    }

    #[test]
    fn assistant_event_enqueues_both_job_types() {
        let (_dir, mut store) = open_tmp();
        let raw = br#"{"type":"Stop","role":"assistant","content":"done","session_id":"S1"}"#;
        ingest(&mut store, raw).unwrap();

        assert!(store.job_claim(CoreJobType::SanitizeAsync).unwrap().is_some());
        assert!(store.job_claim(CoreJobType::ExtractLearningAi).unwrap().is_some());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let (_dir, mut store) = open_tmp();
        let raw = br#"{"type":"X","role":"system","content":"hi"}"#;
        let err = ingest(&mut store, raw).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn invalid_json_is_rejected() {
        let (_dir, mut store) = open_tmp();
        let err = ingest(&mut store, b"not json").unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn oversize_payload_is_rejected() {
        let (_dir, mut store) = open_tmp();
        let huge = vec![b'a'; MAX_PAYLOAD_BYTES + 1];
        let err = ingest(&mut store, &huge).unwrap_err();
        assert_eq!(err.code(), "OVERSIZE_PAYLOAD");
    }

    #[test]
    fn reusing_a_session_id_appends_to_the_same_conversation() {
        let (_dir, mut store) = open_tmp();
        ingest(
            &mut store,
            br#"{"type":"UserPromptSubmit","role":"user","prompt":"first","session_id":"S1"}"#,
        )
        .unwrap();
        ingest(
            &mut store,
            br#"{"type":"UserPromptSubmit","role":"user","prompt":"second","session_id":"S1"}"#,
        )
        .unwrap();

        let conv = store.conversation_resolve(Some("S1")).unwrap();
        let messages = store.messages_list_by_conversation(&conv.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sequence, 1);
        assert_eq!(messages[1].sequence, 2);
    }
}
