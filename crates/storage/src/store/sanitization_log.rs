#![forbid(unsafe_code)]

use super::support::{json_string_array, parse_json_string_array};
use super::{SanitizationLogRow, SqliteStore, StoreError, now_rfc3339};
use cg_core::ids::{MessageId, SanitizationLogId};
use rusqlite::params;

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SanitizationLogRow> {
    let id: String = row.get(0)?;
    let message_id: String = row.get(1)?;
    let issues: String = row.get(2)?;
    Ok(SanitizationLogRow {
        id: SanitizationLogId::try_new(id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "id".into(), rusqlite::types::Type::Text)
        })?,
        message_id: MessageId::try_new(message_id).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "message_id".into(), rusqlite::types::Type::Text)
        })?,
        issues: parse_json_string_array(&issues),
        created_at: row.get(3)?,
    })
}

impl SqliteStore {
    /// Appends one sanitization-log row when the async validator finds
    /// residual PII (spec.md §4.6). Rows are append-only — never mutated.
    pub fn sanitization_log_append(
        &mut self,
        message_id: &MessageId,
        issues: &[String],
    ) -> Result<SanitizationLogId, StoreError> {
        let id = SanitizationLogId::generate();
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO sanitization_log(id, message_id, issues, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.as_str(), message_id.as_str(), json_string_array(issues), now],
        )?;
        Ok(id)
    }

    pub fn sanitization_log_for_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Vec<SanitizationLogRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, message_id, issues, created_at FROM sanitization_log
             WHERE message_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![message_id.as_str()], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
