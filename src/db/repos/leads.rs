use crate::db::models::{Lead, LeadStatus, LeadUpdate};
use crate::db::repos::collection::{self, Entity, Updatable};
use crate::db::repos::kv;
use crate::db::storage_keys;
use crate::db::DbPool;
use crate::error::AppError;

impl Entity for Lead {
    const KEY: &'static str = storage_keys::LEADS;
    const LABEL: &'static str = "Lead";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Updatable for Lead {
    type Update = LeadUpdate;

    fn apply(&mut self, update: LeadUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(company) = update.company {
            self.company = company;
        }
        if let Some(domain) = update.domain {
            self.domain = domain;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

pub fn get_all_for(pool: &DbPool, user_id: &str) -> Result<Vec<Lead>, AppError> {
    collection::all_for(pool, user_id)
}

pub fn get_by_status(pool: &DbPool, user_id: &str, status: LeadStatus) -> Result<Vec<Lead>, AppError> {
    let mut leads = get_all_for(pool, user_id)?;
    leads.retain(|lead| lead.status == status);
    Ok(leads)
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<Lead, AppError> {
    collection::get_by_id(pool, id)
}

pub fn append(pool: &DbPool, lead: Lead) -> Result<(), AppError> {
    collection::append(pool, lead)
}

pub fn append_many(pool: &DbPool, leads: Vec<Lead>) -> Result<(), AppError> {
    collection::append_many(pool, leads)
}

pub fn update_by_id(pool: &DbPool, id: &str, update: LeadUpdate) -> Result<bool, AppError> {
    collection::update_by_id::<Lead>(pool, id, update)
}

/// Set `status` on every lead whose id is in `ids`, in one write.
/// Returns how many leads matched.
pub fn set_status_many(pool: &DbPool, ids: &[String], status: LeadStatus) -> Result<usize, AppError> {
    let changed = kv::modify(pool, Lead::KEY, |leads: &mut Vec<Lead>| {
        let mut count = 0;
        for lead in leads.iter_mut().filter(|lead| ids.contains(&lead.id)) {
            lead.status = status;
            count += 1;
        }
        (count > 0).then_some(count)
    })?;
    Ok(changed.unwrap_or(0))
}

pub fn delete_by_id(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    collection::delete_by_id::<Lead>(pool, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    fn lead(user_id: &str, email: &str) -> Lead {
        Lead::new(user_id, "Jane".into(), email.into(), "Acme".into(), "x.com".into())
    }

    #[test]
    fn test_lead_crud() {
        let pool = init_test_db().unwrap();

        let l1 = lead("u1", "a@x.com");
        append(&pool, l1.clone()).unwrap();
        append_many(&pool, vec![lead("u1", "b@x.com"), lead("u2", "c@x.com")]).unwrap();

        // Round-trip: all fields unchanged, owner-scoped, insertion order
        let mine = get_all_for(&pool, "u1").unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0], l1);
        assert_eq!(mine[1].email, "b@x.com");
        assert_eq!(get_all_for(&pool, "u2").unwrap().len(), 1);
        assert!(get_all_for(&pool, "nobody").unwrap().is_empty());

        // Shallow merge touches only the given fields
        assert!(update_by_id(&pool, &l1.id, LeadUpdate::status(LeadStatus::Verified)).unwrap());
        let fetched = get_by_id(&pool, &l1.id).unwrap();
        assert_eq!(fetched.status, LeadStatus::Verified);
        assert_eq!(fetched.email, l1.email);
        assert_eq!(fetched.created_at, l1.created_at);

        // Delete
        assert!(delete_by_id(&pool, &l1.id).unwrap());
        assert!(matches!(get_by_id(&pool, &l1.id), Err(AppError::NotFound(_))));
        assert!(!delete_by_id(&pool, &l1.id).unwrap());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let pool = init_test_db().unwrap();
        append(&pool, lead("u1", "a@x.com")).unwrap();
        let before = kv::get_raw(&pool, storage_keys::LEADS).unwrap();

        let changed = update_by_id(&pool, "missing", LeadUpdate::status(LeadStatus::Failed)).unwrap();
        assert!(!changed);
        assert_eq!(kv::get_raw(&pool, storage_keys::LEADS).unwrap(), before);
    }

    #[test]
    fn test_set_status_many_only_touches_listed_ids() {
        let pool = init_test_db().unwrap();
        let a = lead("u1", "a@x.com");
        let b = lead("u1", "b@x.com");
        let c = lead("u1", "c@x.com");
        append_many(&pool, vec![a.clone(), b.clone(), c.clone()]).unwrap();

        let n = set_status_many(&pool, &[a.id.clone(), c.id.clone()], LeadStatus::Processing).unwrap();
        assert_eq!(n, 2);
        assert_eq!(get_by_id(&pool, &a.id).unwrap().status, LeadStatus::Processing);
        assert_eq!(get_by_id(&pool, &b.id).unwrap().status, LeadStatus::Uploaded);
        assert_eq!(get_by_id(&pool, &c.id).unwrap().status, LeadStatus::Processing);

        let uploaded = get_by_status(&pool, "u1", LeadStatus::Uploaded).unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].id, b.id);
    }
}
