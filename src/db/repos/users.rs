//! Registered accounts and the current session record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::db::repos::kv;
use crate::db::storage_keys;
use crate::db::DbPool;
use crate::engine::crypto::PasswordHash;
use crate::error::AppError;

/// One registered account, keyed by lower-cased email in the mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub credential: PasswordHash,
    pub user: User,
}

pub type Accounts = BTreeMap<String, AccountRecord>;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The whole account mapping; empty if absent or unreadable.
pub fn get_accounts(pool: &DbPool) -> Result<Accounts, AppError> {
    Ok(kv::get_record(pool, storage_keys::USERS)?.unwrap_or_default())
}

pub fn find_account(pool: &DbPool, email: &str) -> Result<Option<AccountRecord>, AppError> {
    let mut accounts = get_accounts(pool)?;
    Ok(accounts.remove(&normalize_email(email)))
}

/// Register `record` under its user's email. Fails with `AlreadyExists`
/// if the email is taken. The check and the insert share one transaction.
pub fn insert_account(pool: &DbPool, record: AccountRecord) -> Result<(), AppError> {
    let key = normalize_email(&record.user.email);
    kv::modify_record(pool, storage_keys::USERS, |accounts: &mut Accounts| {
        if accounts.contains_key(&key) {
            return Err(AppError::AlreadyExists);
        }
        accounts.insert(key, record);
        Ok(())
    })
}

// ── Session ────────────────────────────────────────────────────────

/// The signed-in user, if any. An unreadable session record is deleted
/// and reported as signed out.
pub fn get_session(pool: &DbPool) -> Result<Option<User>, AppError> {
    let Some(raw) = kv::get_raw(pool, storage_keys::SESSION)? else {
        return Ok(None);
    };
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            tracing::warn!(error = %e, "Session record is corrupt, signing out");
            kv::remove(pool, storage_keys::SESSION)?;
            Ok(None)
        }
    }
}

pub fn set_session(pool: &DbPool, user: &User) -> Result<(), AppError> {
    kv::set_record(pool, storage_keys::SESSION, user)
}

/// Returns true if a session was present.
pub fn clear_session(pool: &DbPool) -> Result<bool, AppError> {
    kv::remove(pool, storage_keys::SESSION)
}
