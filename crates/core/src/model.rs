//! Shared enums for the message/job state machines.
//!
//! Mirrors `bm_core::model`'s `TaskKind`: a plain `Copy` enum with an
//! `as_str` that matches the column value stored in SQLite, plus a
//! `from_str` for reading rows back.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobType {
    SanitizeAsync,
    ExtractLearningAi,
    /// Reserved for a later phase (spec.md §3); never enqueued today.
    MineUpload,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::SanitizeAsync => "sanitize_async",
            JobType::ExtractLearningAi => "extract_learning_ai",
            JobType::MineUpload => "mine_upload",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "sanitize_async" => Some(JobType::SanitizeAsync),
            "extract_learning_ai" => Some(JobType::ExtractLearningAi),
            "mine_upload" => Some(JobType::MineUpload),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    DeadLetter,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::DeadLetter => "dead_letter",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "queued" => Some(JobStatus::Queued),
            "in_progress" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            "dead_letter" => Some(JobStatus::DeadLetter),
            _ => None,
        }
    }

    /// `completed` and `dead_letter` are absorbing (spec.md §4.5).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::DeadLetter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips() {
        for role in [Role::User, Role::Assistant] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("system"), None);
    }

    #[test]
    fn job_status_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::DeadLetter.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(!JobStatus::Failed.is_terminal());
    }

    #[test]
    fn job_type_round_trips() {
        for jt in [
            JobType::SanitizeAsync,
            JobType::ExtractLearningAi,
            JobType::MineUpload,
        ] {
            assert_eq!(JobType::from_str(jt.as_str()), Some(jt));
        }
    }
}
