//! JSON documents keyed by name in the `kv_store` table.
//!
//! Lists are always read and written whole: there is no partial or merge
//! write. A document that fails to deserialize is treated as absent; callers
//! that need to tell the two apart read the raw text instead.

use rusqlite::{params, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::DbPool;
use crate::error::AppError;

/// Get the raw document text stored under `key`. Returns None if not found.
pub fn get_raw(pool: &DbPool, key: &str) -> Result<Option<String>, AppError> {
    let conn = pool.get()?;
    read(&conn, key)
}

/// Store raw document text. Creates or replaces the key.
pub fn set_raw(pool: &DbPool, key: &str, value: &str) -> Result<(), AppError> {
    let conn = pool.get()?;
    write(&conn, key, value)
}

/// Delete a document by key. Returns true if a row was deleted.
pub fn remove(pool: &DbPool, key: &str) -> Result<bool, AppError> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
    Ok(rows > 0)
}

/// The list stored under `key`, or empty if absent or unreadable.
pub fn get_all<T: DeserializeOwned>(pool: &DbPool, key: &str) -> Result<Vec<T>, AppError> {
    let raw = get_raw(pool, key)?;
    Ok(decode_list(key, raw))
}

/// Replace the whole list stored under `key`.
pub fn set_all<T: Serialize>(pool: &DbPool, key: &str, items: &[T]) -> Result<(), AppError> {
    let json = serde_json::to_string(items)?;
    set_raw(pool, key, &json)
}

/// The single record stored under `key`, or None if absent or unreadable.
pub fn get_record<T: DeserializeOwned>(pool: &DbPool, key: &str) -> Result<Option<T>, AppError> {
    let Some(raw) = get_raw(pool, key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored record is unreadable, treating as absent");
            Ok(None)
        }
    }
}

pub fn set_record<T: Serialize>(pool: &DbPool, key: &str, record: &T) -> Result<(), AppError> {
    let json = serde_json::to_string(record)?;
    set_raw(pool, key, &json)
}

/// Read-modify-write of the list under `key` inside one IMMEDIATE
/// transaction, so concurrent writers cannot lose each other's updates.
///
/// `f` returns `Some(r)` when it changed the list, which is then written
/// back; `None` leaves the stored document untouched.
pub fn modify<T, R, F>(pool: &DbPool, key: &str, f: F) -> Result<Option<R>, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Option<R>,
{
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut items: Vec<T> = decode_list(key, read(&tx, key)?);

    let Some(result) = f(&mut items) else {
        return Ok(None);
    };

    let json = serde_json::to_string(&items)?;
    write(&tx, key, &json)?;
    tx.commit()?;
    Ok(Some(result))
}

/// Read-modify-write of the single record under `key` inside one
/// IMMEDIATE transaction. An absent or unreadable record starts from
/// `T::default()`. When `f` fails nothing is written.
pub fn modify_record<T, R, F>(pool: &DbPool, key: &str, f: F) -> Result<R, AppError>
where
    T: Serialize + DeserializeOwned + Default,
    F: FnOnce(&mut T) -> Result<R, AppError>,
{
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut record: T = match read(&tx, key)? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Stored record is unreadable, starting over");
            T::default()
        }),
        None => T::default(),
    };

    let result = f(&mut record)?;

    let json = serde_json::to_string(&record)?;
    write(&tx, key, &json)?;
    tx.commit()?;
    Ok(result)
}

fn read(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>, AppError> {
    let raw = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(raw)
}

fn write(conn: &rusqlite::Connection, key: &str, value: &str) -> Result<(), AppError> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
        params![key, value, now],
    )?;
    Ok(())
}

fn decode_list<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "Stored list is unreadable, treating as empty");
            Vec::new()
        }
    }
}
