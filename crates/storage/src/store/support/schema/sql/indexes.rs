#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"
        CREATE INDEX IF NOT EXISTS idx_messages_conversation_sequence
          ON messages(conversation_id, sequence);

        CREATE INDEX IF NOT EXISTS idx_job_queue_status_type_created
          ON job_queue(status, type, created_at);

        CREATE INDEX IF NOT EXISTS idx_sanitization_log_message_created
          ON sanitization_log(message_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_learnings_created_at_desc
          ON learnings(created_at DESC);

        CREATE INDEX IF NOT EXISTS idx_learnings_title_content
          ON learnings(title, content);
"#;
