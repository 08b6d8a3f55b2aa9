use crate::db::models::{ActivityType, Avatar, PendingScript, Video, VideoStatus, VideoUpdate};
use crate::db::repos::{activities, videos as repo};
use crate::engine::csv_import;
use crate::error::AppError;
use crate::AppState;

pub fn list_videos(state: &AppState) -> Result<Vec<Video>, AppError> {
    let user = state.auth.require_user()?;
    repo::get_all_for(&state.db, &user.id)
}

/// Parse a script sheet for review before anything is rendered.
pub fn parse_video_scripts(state: &AppState, csv_text: &str) -> Result<Vec<PendingScript>, AppError> {
    state.auth.require_user()?;
    csv_import::parse_scripts(csv_text)
}

/// Render each script in order with the chosen presenter.
///
/// A failed render marks that video `failed` and stops the batch; videos
/// already rendered keep their stored status.
pub async fn generate_videos(
    state: &AppState,
    scripts: Vec<PendingScript>,
    avatar: Avatar,
) -> Result<Vec<Video>, AppError> {
    let user = state.auth.require_user()?;
    if scripts.is_empty() {
        return Err(AppError::Validation("No scripts to process".into()));
    }

    let mut created = Vec::with_capacity(scripts.len());
    for PendingScript { name, script } in scripts {
        let video = Video::processing(&user.id, name, script, avatar);
        repo::append(&state.db, video.clone())?;

        if let Err(e) = state
            .triggers
            .generate_video(&video.id, &video.script, video.avatar)
            .await
        {
            tracing::warn!(video_id = %video.id, error = %e, "Video render failed");
            repo::update_by_id(
                &state.db,
                &video.id,
                VideoUpdate { status: Some(VideoStatus::Failed), ..Default::default() },
            )?;
            return Err(e);
        }

        activities::record(
            &state.db,
            &user.id,
            ActivityType::VideoCreated,
            format!("Generated video: {}", video.name),
        )?;
        created.push(repo::get_by_id(&state.db, &video.id)?);
    }

    tracing::info!(user_id = %user.id, count = created.len(), avatar = avatar.as_id(), "Videos generated");
    Ok(created)
}
