#![forbid(unsafe_code)]

use cg_core::ids::{ConversationId, JobId, LearningId, MessageId, SanitizationLogId};
use cg_core::model::{JobStatus, JobType, Role};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationRow {
    pub id: ConversationId,
    pub session_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRow {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: Role,
    pub content: String,
    pub sequence: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobRow {
    pub id: JobId,
    pub job_type: JobType,
    pub payload: String,
    pub status: JobStatus,
    pub attempts: i64,
    pub max_attempts: i64,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizationLogRow {
    pub id: SanitizationLogId,
    pub message_id: MessageId,
    pub issues: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearningRow {
    pub id: LearningId,
    pub conversation_id: ConversationId,
    pub category: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}
