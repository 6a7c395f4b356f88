#![forbid(unsafe_code)]

use super::{LearningRow, SqliteStore, StoreError, now_rfc3339};
use cg_core::ids::{ConversationId, LearningId};
use rusqlite::{OptionalExtension, params};

const DEFAULT_SEARCH_LIMIT: i64 = 10;
const MIN_SEARCH_LIMIT: i64 = 1;
const MAX_SEARCH_LIMIT: i64 = 50;

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LearningRow> {
    let id: String = row.get(0)?;
    let conversation_id: String = row.get(1)?;
    Ok(LearningRow {
        id: LearningId::try_new(id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "id".into(), rusqlite::types::Type::Text)
        })?,
        conversation_id: ConversationId::try_new(conversation_id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                1,
                "conversation_id".into(),
                rusqlite::types::Type::Text,
            )
        })?,
        category: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

impl SqliteStore {
    /// Appends a learning row. The extractor deliberately never
    /// deduplicates (spec.md §4.7 "Idempotence"); repeat extractions
    /// produce additional rows.
    pub fn learning_append(
        &mut self,
        conversation_id: &ConversationId,
        category: &str,
        title: &str,
        content: &str,
    ) -> Result<LearningId, StoreError> {
        let id = LearningId::generate();
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO learnings(id, conversation_id, category, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.as_str(),
                conversation_id.as_str(),
                category,
                title,
                content,
                now
            ],
        )?;
        Ok(id)
    }

    /// Exact lookup by primary key (spec.md §4.8 `get_learning`).
    pub fn learning_get(&self, id: &LearningId) -> Result<Option<LearningRow>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, conversation_id, category, title, content, created_at
                 FROM learnings WHERE id = ?1",
                params![id.as_str()],
                read_row,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// Case-sensitive substring search over `title` OR `content`, newest
    /// first, `limit` clamped to `[1, 50]` with a default of 10
    /// (spec.md §4.8 `search_learnings`). Uses SQLite's byte-wise `instr`
    /// rather than `LIKE` so matching stays case-sensitive without
    /// touching the connection-wide `case_sensitive_like` pragma.
    pub fn learning_search(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<LearningRow>, StoreError> {
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(MIN_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

        let mut stmt = self.conn.prepare(
            "SELECT id, conversation_id, category, title, content, created_at
             FROM learnings
             WHERE instr(title, ?1) > 0 OR instr(content, ?1) > 0
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![query, limit], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
