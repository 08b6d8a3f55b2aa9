use rusqlite::Connection;

use crate::error::AppError;

/// Run the schema migration. Idempotent.
pub fn run(conn: &Connection) -> Result<(), AppError> {
    tracing::debug!("Running database migrations");

    conn.execute_batch(SCHEMA)?;

    tracing::info!("Database migrations complete");
    Ok(())
}

const SCHEMA: &str = r#"

-- ============================================================================
-- Key-value documents
--
-- Every entity collection (leads, videos, campaigns, activities), the
-- credential mapping and the session record live here as one JSON document
-- per key. See db/storage_keys.rs for the keys.
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

"#;
