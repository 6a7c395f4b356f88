#![forbid(unsafe_code)]

mod conversations;
pub mod error;
mod jobs;
mod learnings;
mod messages;
mod sanitization_log;
mod support;
pub mod types;

pub use error::StoreError;
pub use types::*;

use rusqlite::Connection;
use std::path::Path;

/// Scoped acquisition of a database handle: owns the one `Connection` for
/// its lifetime and closes it on drop. No process-wide singleton — every
/// binary (`cg-hook`, `cg-worker`, `cg-query`) opens its own, matching
/// `bm_storage::SqliteStore::open`.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
            "#,
        )?;
        support::schema::migrate_sqlite_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn now_rfc3339() -> String {
    cg_core::time::now_rfc3339()
}
