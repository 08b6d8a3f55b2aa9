//! Typed, owner-scoped list operations shared by the entity repositories.
//!
//! Each entity owns one storage key holding every user's records in
//! insertion order. Reads filter by owner; writes go through
//! [`kv::modify`] so each one is a single transaction.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::repos::kv;
use crate::db::DbPool;
use crate::error::AppError;

/// A record stored in an owner-scoped list.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Storage key of the list holding every record of this type.
    const KEY: &'static str;
    /// Human-readable name for error messages and logs.
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
}

/// An entity that supports shallow-merge partial updates.
pub trait Updatable: Entity {
    type Update;

    /// Overwrite the fields set in `update`, leave the rest.
    fn apply(&mut self, update: Self::Update);
}

/// Every record of type `E` owned by `user_id`, oldest first.
pub fn all_for<E: Entity>(pool: &DbPool, user_id: &str) -> Result<Vec<E>, AppError> {
    let mut items: Vec<E> = kv::get_all(pool, E::KEY)?;
    items.retain(|item| item.user_id() == user_id);
    Ok(items)
}

pub fn get_by_id<E: Entity>(pool: &DbPool, id: &str) -> Result<E, AppError> {
    kv::get_all::<E>(pool, E::KEY)?
        .into_iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} {id} not found", E::LABEL)))
}

/// Like [`get_by_id`], but a record owned by someone else is reported as
/// missing rather than leaked.
pub fn get_owned<E: Entity>(pool: &DbPool, user_id: &str, id: &str) -> Result<E, AppError> {
    let item = get_by_id::<E>(pool, id)?;
    if item.user_id() != user_id {
        return Err(AppError::NotFound(format!("{} {id} not found", E::LABEL)));
    }
    Ok(item)
}

pub fn append<E: Entity>(pool: &DbPool, item: E) -> Result<(), AppError> {
    append_many(pool, vec![item])
}

pub fn append_many<E: Entity>(pool: &DbPool, new_items: Vec<E>) -> Result<(), AppError> {
    if new_items.is_empty() {
        return Ok(());
    }
    let count = new_items.len();
    kv::modify(pool, E::KEY, move |items: &mut Vec<E>| {
        items.extend(new_items);
        Some(())
    })?;
    tracing::debug!(kind = E::LABEL, count, "Appended records");
    Ok(())
}

/// Merge `update` into the first record with `id`. An unknown id is a
/// silent no-op. Returns whether a record was changed.
pub fn update_by_id<E: Updatable>(pool: &DbPool, id: &str, update: E::Update) -> Result<bool, AppError> {
    let updated = kv::modify(pool, E::KEY, |items: &mut Vec<E>| {
        let item = items.iter_mut().find(|item| item.id() == id)?;
        item.apply(update);
        Some(())
    })?;
    Ok(updated.is_some())
}

/// Remove every record with `id`. Returns whether anything was removed.
pub fn delete_by_id<E: Entity>(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    let removed = kv::modify(pool, E::KEY, |items: &mut Vec<E>| {
        let before = items.len();
        items.retain(|item| item.id() != id);
        (items.len() < before).then_some(())
    })?;
    Ok(removed.is_some())
}
