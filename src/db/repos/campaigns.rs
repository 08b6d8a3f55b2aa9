use crate::db::models::{Campaign, CampaignStatus, CampaignUpdate};
use crate::db::repos::collection::{self, Entity, Updatable};
use crate::db::storage_keys;
use crate::db::DbPool;
use crate::error::AppError;

impl Entity for Campaign {
    const KEY: &'static str = storage_keys::CAMPAIGNS;
    const LABEL: &'static str = "Campaign";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Updatable for Campaign {
    type Update = CampaignUpdate;

    fn apply(&mut self, update: CampaignUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(video_id) = update.video_id {
            self.video_id = video_id;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(scheduled_at) = update.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
    }
}

pub fn get_all_for(pool: &DbPool, user_id: &str) -> Result<Vec<Campaign>, AppError> {
    collection::all_for(pool, user_id)
}

pub fn count_by_status(pool: &DbPool, user_id: &str, status: CampaignStatus) -> Result<usize, AppError> {
    Ok(get_all_for(pool, user_id)?
        .iter()
        .filter(|c| c.status == status)
        .count())
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<Campaign, AppError> {
    collection::get_by_id(pool, id)
}

pub fn get_owned(pool: &DbPool, user_id: &str, id: &str) -> Result<Campaign, AppError> {
    collection::get_owned(pool, user_id, id)
}

pub fn append(pool: &DbPool, campaign: Campaign) -> Result<(), AppError> {
    collection::append(pool, campaign)
}

pub fn update_by_id(pool: &DbPool, id: &str, update: CampaignUpdate) -> Result<bool, AppError> {
    collection::update_by_id::<Campaign>(pool, id, update)
}

pub fn delete_by_id(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    collection::delete_by_id::<Campaign>(pool, id)
}
