#![forbid(unsafe_code)]

use super::{ConversationRow, SqliteStore, StoreError, now_rfc3339};
use cg_core::ids::ConversationId;
use rusqlite::{OptionalExtension, params};

fn read_conversation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConversationRow> {
    let id: String = row.get(0)?;
    Ok(ConversationRow {
        id: ConversationId::try_new(id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "id".into(), rusqlite::types::Type::Text)
        })?,
        session_id: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

impl SqliteStore {
    /// Resolves a conversation id from an optional session id, creating a
    /// new conversation when none exists for the session (spec.md §4.3b).
    /// A session-less event always gets a brand-new conversation.
    pub fn conversation_resolve(
        &mut self,
        session_id: Option<&str>,
    ) -> Result<ConversationRow, StoreError> {
        let tx = self.conn.transaction()?;
        let now = now_rfc3339();

        if let Some(session_id) = session_id {
            let existing = tx
                .query_row(
                    "SELECT id, session_id, created_at, updated_at FROM conversations WHERE session_id = ?1",
                    params![session_id],
                    read_conversation_row,
                )
                .optional()?;

            if let Some(existing) = existing {
                tx.execute(
                    "UPDATE conversations SET updated_at = ?2 WHERE id = ?1",
                    params![existing.id.as_str(), now],
                )?;
                tx.commit()?;
                return Ok(ConversationRow {
                    updated_at: now,
                    ..existing
                });
            }
        }

        let id = ConversationId::generate();
        tx.execute(
            "INSERT INTO conversations(id, session_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![id.as_str(), session_id, now],
        )?;
        tx.commit()?;
        Ok(ConversationRow {
            id,
            session_id: session_id.map(str::to_string),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn conversation_get(
        &self,
        id: &ConversationId,
    ) -> Result<Option<ConversationRow>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, session_id, created_at, updated_at FROM conversations WHERE id = ?1",
                params![id.as_str()],
                read_conversation_row,
            )
            .optional()
            .map_err(StoreError::from)
    }
}
