use crate::db::models::{Video, VideoStatus, VideoUpdate};
use crate::db::repos::collection::{self, Entity, Updatable};
use crate::db::storage_keys;
use crate::db::DbPool;
use crate::error::AppError;

impl Entity for Video {
    const KEY: &'static str = storage_keys::VIDEOS;
    const LABEL: &'static str = "Video";

    fn id(&self) -> &str {
        &self.id
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Updatable for Video {
    type Update = VideoUpdate;

    fn apply(&mut self, update: VideoUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(script) = update.script {
            self.script = script;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(video_url) = update.video_url {
            self.video_url = video_url;
        }
    }
}

pub fn get_all_for(pool: &DbPool, user_id: &str) -> Result<Vec<Video>, AppError> {
    collection::all_for(pool, user_id)
}

pub fn get_by_status(pool: &DbPool, user_id: &str, status: VideoStatus) -> Result<Vec<Video>, AppError> {
    let mut videos = get_all_for(pool, user_id)?;
    videos.retain(|video| video.status == status);
    Ok(videos)
}

pub fn get_by_id(pool: &DbPool, id: &str) -> Result<Video, AppError> {
    collection::get_by_id(pool, id)
}

pub fn get_owned(pool: &DbPool, user_id: &str, id: &str) -> Result<Video, AppError> {
    collection::get_owned(pool, user_id, id)
}

pub fn append(pool: &DbPool, video: Video) -> Result<(), AppError> {
    collection::append(pool, video)
}

pub fn update_by_id(pool: &DbPool, id: &str, update: VideoUpdate) -> Result<bool, AppError> {
    collection::update_by_id::<Video>(pool, id, update)
}

pub fn delete_by_id(pool: &DbPool, id: &str) -> Result<bool, AppError> {
    collection::delete_by_id::<Video>(pool, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;
    use crate::db::models::Avatar;

    #[test]
    fn test_video_crud() {
        let pool = init_test_db().unwrap();

        let v1 = Video::processing("u1", "Intro".into(), "Hello {name}".into(), Avatar::CorporateMale);
        let v2 = Video::processing("u2", "Other".into(), "Hi".into(), Avatar::default());
        append(&pool, v1.clone()).unwrap();
        append(&pool, v2.clone()).unwrap();

        let mine = get_all_for(&pool, "u1").unwrap();
        assert_eq!(mine, vec![v1.clone()]);

        // Completing a render sets the URL, leaves the script alone
        let changed = update_by_id(
            &pool,
            &v1.id,
            VideoUpdate {
                status: Some(VideoStatus::Completed),
                video_url: Some(Some("https://example.com/video.mp4".into())),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(changed);
        let done = get_by_id(&pool, &v1.id).unwrap();
        assert_eq!(done.status, VideoStatus::Completed);
        assert_eq!(done.video_url.as_deref(), Some("https://example.com/video.mp4"));
        assert_eq!(done.script, "Hello {name}");

        assert_eq!(get_by_status(&pool, "u1", VideoStatus::Completed).unwrap().len(), 1);
        assert!(get_by_status(&pool, "u2", VideoStatus::Completed).unwrap().is_empty());

        // Ownership check hides other users' videos
        assert!(get_owned(&pool, "u1", &v1.id).is_ok());
        assert!(matches!(get_owned(&pool, "u1", &v2.id), Err(AppError::NotFound(_))));

        assert!(delete_by_id(&pool, &v2.id).unwrap());
        assert!(get_all_for(&pool, "u2").unwrap().is_empty());
    }
}
