#![forbid(unsafe_code)]

use super::super::super::StoreError;
use rusqlite::Connection;

/// Additive schema changes beyond the `CREATE TABLE IF NOT EXISTS` baseline
/// land here, one module per change, the way `bm_storage`'s
/// `support::schema::migrations` grows one file per table evolution. There
/// are none yet for `contextguard`'s v1 schema.
pub(super) fn apply(_conn: &Connection) -> Result<(), StoreError> {
    Ok(())
}
