use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, StoreError};

/// Schema version stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Initialise the key-value table and stamp the schema version.
///
/// Safe to call on every startup. Refuses files stamped by a newer schema.
pub fn init_db(conn: &Connection) -> Result<()> {
    let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key         TEXT NOT NULL PRIMARY KEY,  -- '<section>.<field>'
            value       TEXT NOT NULL,              -- JSON-encoded field value
            updated_at  TEXT NOT NULL
        );",
    )?;

    if found < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        info!(from = found, to = SCHEMA_VERSION, "store schema migrated");
    }
    Ok(())
}
