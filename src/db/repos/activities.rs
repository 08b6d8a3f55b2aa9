use crate::db::models::{Activity, ActivityType};
use crate::db::repos::collection::{self, Entity};
use crate::db::storage_keys;
use crate::db::DbPool;
use crate::error::AppError;

/// How many entries the activity feed shows. Storage keeps everything.
pub const RECENT_LIMIT: usize = 10;

impl Entity for Activity {
    const KEY: &'static str = storage_keys::ACTIVITIES;
    const LABEL: &'static str = "Activity";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

pub fn append(pool: &DbPool, activity: Activity) -> Result<(), AppError> {
    collection::append(pool, activity)
}

/// Build and append a log entry stamped now.
pub fn record(
    pool: &DbPool,
    user_id: &str,
    activity_type: ActivityType,
    message: impl Into<String>,
) -> Result<Activity, AppError> {
    let activity = Activity::new(user_id, activity_type, message);
    append(pool, activity.clone())?;
    tracing::info!(user_id, kind = ?activity_type, message = %activity.message, "Activity recorded");
    Ok(activity)
}

/// The user's ten most recent entries, newest first.
pub fn get_recent_for(pool: &DbPool, user_id: &str) -> Result<Vec<Activity>, AppError> {
    let mut activities: Vec<Activity> = collection::all_for(pool, user_id)?;
    // Reverse first so the stable sort breaks timestamp ties by latest append.
    activities.reverse();
    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(RECENT_LIMIT);
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::db::repos::kv;
    use chrono::{Duration, Utc};

    fn at(user_id: &str, minutes_ago: i64, message: &str) -> Activity {
        let mut activity = Activity::new(user_id, ActivityType::LeadUploaded, message);
        activity.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        activity
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let pool = init_test_db().unwrap();
        // Appended out of order on purpose
        for i in [5, 1, 12, 3, 0, 7, 9, 2, 11, 4, 6, 8, 10] {
            append(&pool, at("u1", i, &format!("{i} minutes ago"))).unwrap();
        }
        append(&pool, at("u2", 0, "someone else")).unwrap();

        let recent = get_recent_for(&pool, "u1").unwrap();
        assert_eq!(recent.len(), RECENT_LIMIT);
        assert_eq!(recent[0].message, "0 minutes ago");
        assert_eq!(recent[9].message, "9 minutes ago");
        assert!(recent.iter().all(|a| a.user_id == "u1"));

        // Truncation is a read-time view only
        let stored: Vec<Activity> = kv::get_all(&pool, storage_keys::ACTIVITIES).unwrap();
        assert_eq!(stored.len(), 14);
    }

    #[test]
    fn test_record_appends_entry() {
        let pool = init_test_db().unwrap();
        let entry = record(&pool, "u1", ActivityType::CampaignStarted, "Created campaign: Q3").unwrap();
        let recent = get_recent_for(&pool, "u1").unwrap();
        assert_eq!(recent, vec![entry]);
        assert_eq!(recent[0].activity_type, ActivityType::CampaignStarted);
    }
}
