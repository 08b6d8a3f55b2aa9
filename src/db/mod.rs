pub mod migrations;
pub mod models;
pub mod repos;
pub mod storage_keys;

use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

use crate::error::AppError;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Per-connection pragmas. WAL is database-wide and set once in [`init_db`].
#[derive(Debug)]
struct Pragmas;

impl CustomizeConnection<rusqlite::Connection, rusqlite::Error> for Pragmas {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            "PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;",
        )
    }
}

/// Open a pool on `path` and bring the schema up to date.
fn open_pool(path: &Path, max_size: u32) -> Result<DbPool, AppError> {
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(5))
        .connection_customizer(Box::new(Pragmas))
        .build(SqliteConnectionManager::file(path))?;

    migrations::run(&*pool.get()?)?;
    Ok(pool)
}

/// Open (or create) `outreach.db` under `data_dir` with WAL journaling.
pub fn init_db(data_dir: &Path) -> Result<DbPool, AppError> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("outreach.db");
    tracing::info!(path = %db_path.display(), "Opening local store");

    let pool = open_pool(&db_path, 8)?;
    pool.get()?.execute_batch("PRAGMA journal_mode = WAL;")?;

    tracing::info!("Local store ready (max_size=8)");
    Ok(pool)
}

/// A throwaway store in the temp dir. File-backed because every r2d2
/// connection to `:memory:` would see its own empty database.
#[cfg(test)]
pub fn init_test_db() -> Result<DbPool, AppError> {
    let path = std::env::temp_dir().join(format!("outreach_test_{}.db", uuid::Uuid::new_v4()));
    open_pool(&path, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_db(dir.path()).unwrap();
        assert!(dir.path().join("outreach.db").exists());

        let conn = pool.get().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        drop(init_db(dir.path()).unwrap());
        assert!(init_db(dir.path()).is_ok());
    }
}
