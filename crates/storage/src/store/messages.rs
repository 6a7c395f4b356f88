#![forbid(unsafe_code)]

use super::{MessageRow, SqliteStore, StoreError, now_rfc3339};
use cg_core::ids::{ConversationId, MessageId};
use cg_core::model::Role;
use rusqlite::params;

fn read_message_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    let id: String = row.get(0)?;
    let conversation_id: String = row.get(1)?;
    let role: String = row.get(2)?;
    Ok(MessageRow {
        id: MessageId::try_new(id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "id".into(), rusqlite::types::Type::Text)
        })?,
        conversation_id: ConversationId::try_new(conversation_id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                1,
                "conversation_id".into(),
                rusqlite::types::Type::Text,
            )
        })?,
        role: Role::from_str(&role).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(2, "role".into(), rusqlite::types::Type::Text)
        })?,
        content: row.get(3)?,
        sequence: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl SqliteStore {
    /// Inserts one *already-sanitized* message row. `sequence` is assigned
    /// inside the same transaction as the insert by reading the current
    /// max and adding one; the `UNIQUE(conversation_id, sequence)`
    /// constraint is the authoritative guard against a race producing a
    /// duplicate (spec.md §4.3 "Ordering").
    pub fn message_insert(
        &mut self,
        conversation_id: &ConversationId,
        role: Role,
        sanitized_content: &str,
    ) -> Result<MessageRow, StoreError> {
        let tx = self.conn.transaction()?;

        let next_sequence: i64 = tx.query_row(
            "SELECT COALESCE(MAX(sequence), 0) + 1 FROM messages WHERE conversation_id = ?1",
            params![conversation_id.as_str()],
            |row| row.get(0),
        )?;

        let id = MessageId::generate();
        let now = now_rfc3339();
        tx.execute(
            "INSERT INTO messages(id, conversation_id, role, content, sequence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.as_str(),
                conversation_id.as_str(),
                role.as_str(),
                sanitized_content,
                next_sequence,
                now,
            ],
        )?;
        tx.commit()?;

        Ok(MessageRow {
            id,
            conversation_id: conversation_id.clone(),
            role,
            content: sanitized_content.to_string(),
            sequence: next_sequence,
            created_at: now,
        })
    }

    pub fn message_get(&self, id: &MessageId) -> Result<Option<MessageRow>, StoreError> {
        use rusqlite::OptionalExtension;
        self.conn
            .query_row(
                "SELECT id, conversation_id, role, content, sequence, created_at
                 FROM messages WHERE id = ?1",
                params![id.as_str()],
                read_message_row,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// Loads the full message sequence for a conversation, ordered by
    /// `sequence` — the extractor's input (spec.md §4.7).
    pub fn messages_list_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<MessageRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, conversation_id, role, content, sequence, created_at
             FROM messages WHERE conversation_id = ?1 ORDER BY sequence ASC",
        )?;
        let rows = stmt
            .query_map(params![conversation_id.as_str()], read_message_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
