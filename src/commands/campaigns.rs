use chrono::Utc;

use crate::db::models::{
    ActivityType, Campaign, CampaignStatus, CreateCampaignInput, LeadSelection, LeadStatus,
    VideoStatus,
};
use crate::db::repos::{activities, campaigns as repo, leads, videos};
use crate::error::AppError;
use crate::validation;
use crate::AppState;

const FIRST_TEN: usize = 10;

pub fn list_campaigns(state: &AppState) -> Result<Vec<Campaign>, AppError> {
    let user = state.auth.require_user()?;
    repo::get_all_for(&state.db, &user.id)
}

/// Create a campaign over a snapshot of the user's verified leads.
pub fn create_campaign(state: &AppState, input: CreateCampaignInput) -> Result<Campaign, AppError> {
    let user = state.auth.require_user()?;

    let name = input.name.trim();
    if name.is_empty() || input.video_id.trim().is_empty() {
        return Err(AppError::Validation("Please fill in all required fields".into()));
    }
    let video = videos::get_owned(&state.db, &user.id, &input.video_id)?;
    if video.status != VideoStatus::Completed {
        return Err(AppError::Validation("Only completed videos can be used in a campaign".into()));
    }

    let verified = leads::get_by_status(&state.db, &user.id, LeadStatus::Verified)?;
    let take = match input.lead_selection {
        LeadSelection::All => verified.len(),
        LeadSelection::FirstTen => FIRST_TEN,
    };
    let lead_ids: Vec<String> = verified.into_iter().take(take).map(|lead| lead.id).collect();

    let status = if input.scheduled_at.is_some() {
        CampaignStatus::Scheduled
    } else {
        CampaignStatus::Draft
    };

    let campaign = Campaign {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        name: name.to_string(),
        lead_ids,
        video_id: input.video_id,
        status,
        scheduled_at: input.scheduled_at,
        created_at: Utc::now(),
    };
    repo::append(&state.db, campaign.clone())?;
    activities::record(
        &state.db,
        &user.id,
        ActivityType::CampaignStarted,
        format!("Created campaign: {}", campaign.name),
    )?;

    tracing::info!(
        campaign_id = %campaign.id,
        leads = campaign.lead_ids.len(),
        status = ?campaign.status,
        "Campaign created"
    );
    Ok(campaign)
}

pub async fn start_campaign(state: &AppState, id: &str) -> Result<Campaign, AppError> {
    let user = state.auth.require_user()?;
    validation::require_valid_id("Campaign ID", id)?;
    repo::get_owned(&state.db, &user.id, id)?;
    state.triggers.launch_campaign(id).await?;
    repo::get_by_id(&state.db, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{leads as lead_cmds, videos as video_cmds};
    use crate::db::models::{Avatar, PendingScript, Video};
    use crate::test_support::signed_in_state;

    async fn video_id(state: &AppState) -> String {
        let scripts = vec![PendingScript { name: "Intro".into(), script: "Hi".into() }];
        let videos = video_cmds::generate_videos(state, scripts, Avatar::default()).await.unwrap();
        videos[0].id.clone()
    }

    fn input(name: &str, video_id: &str) -> CreateCampaignInput {
        CreateCampaignInput {
            name: name.into(),
            video_id: video_id.into(),
            lead_selection: LeadSelection::All,
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn test_draft_then_running() {
        let (state, _dir) = signed_in_state().await;
        let campaign = Campaign {
            id: "c1".into(),
            user_id: state.auth.require_user().unwrap().id,
            name: "Launch".into(),
            lead_ids: vec!["l1".into(), "l2".into()],
            video_id: "v1".into(),
            status: CampaignStatus::Draft,
            scheduled_at: None,
            created_at: Utc::now(),
        };
        repo::append(&state.db, campaign.clone()).unwrap();

        let started = start_campaign(&state, "c1").await.unwrap();
        assert_eq!(started.status, CampaignStatus::Running);
        assert_eq!(started.lead_ids, vec!["l1".to_string(), "l2".to_string()]);
        assert_eq!(started.video_id, "v1");
    }

    #[tokio::test]
    async fn test_create_snapshots_verified_leads() {
        let (state, _dir) = signed_in_state().await;
        let mut csv = String::from("name,email,company,domain\n");
        for i in 0..12 {
            csv.push_str(&format!("L{i},l{i}@x.com,Acme,x.com\n"));
        }
        lead_cmds::upload_leads(&state, &csv).unwrap();
        lead_cmds::verify_uploaded_leads(&state).await.unwrap();
        let video = video_id(&state).await;

        let all = create_campaign(&state, input("All", &video)).unwrap();
        assert_eq!(all.lead_ids.len(), 12);
        assert_eq!(all.status, CampaignStatus::Draft);

        let ten = create_campaign(
            &state,
            CreateCampaignInput { lead_selection: LeadSelection::FirstTen, ..input("Ten", &video) },
        )
        .unwrap();
        assert_eq!(ten.lead_ids, all.lead_ids[..10].to_vec());

        let scheduled = create_campaign(
            &state,
            CreateCampaignInput { scheduled_at: Some(Utc::now()), ..input("Later", &video) },
        )
        .unwrap();
        assert_eq!(scheduled.status, CampaignStatus::Scheduled);

        // Later uploads do not join existing campaigns
        lead_cmds::upload_leads(&state, "name,email,company,domain\nNew,new@x.com,A,x.com").unwrap();
        lead_cmds::verify_uploaded_leads(&state).await.unwrap();
        assert_eq!(repo::get_by_id(&state.db, &all.id).unwrap().lead_ids.len(), 12);

        assert_eq!(list_campaigns(&state).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (state, _dir) = signed_in_state().await;
        let err = create_campaign(&state, input(" ", "v1")).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let err = create_campaign(&state, input("Name", "missing-video")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_campaigns(&state).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_completed_video() {
        let (state, _dir) = signed_in_state().await;
        let user = state.auth.require_user().unwrap();

        let rendering = Video::processing(&user.id, "Draft cut".into(), "Hi".into(), Avatar::default());
        videos::append(&state.db, rendering.clone()).unwrap();
        let err = create_campaign(&state, input("Too early", &rendering.id)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let broken = Video { status: VideoStatus::Failed, ..Video::processing(&user.id, "Broken".into(), "Hi".into(), Avatar::default()) };
        videos::append(&state.db, broken.clone()).unwrap();
        assert!(matches!(create_campaign(&state, input("Broken", &broken.id)), Err(AppError::Validation(_))));

        assert!(list_campaigns(&state).unwrap().is_empty());

        let ready = video_id(&state).await;
        assert!(create_campaign(&state, input("Ready", &ready)).is_ok());
    }

    #[tokio::test]
    async fn test_cannot_start_foreign_campaign() {
        let (state, _dir) = signed_in_state().await;
        let foreign = Campaign {
            id: "c9".into(),
            user_id: "someone-else".into(),
            name: "Theirs".into(),
            lead_ids: vec![],
            video_id: "v".into(),
            status: CampaignStatus::Draft,
            scheduled_at: None,
            created_at: Utc::now(),
        };
        repo::append(&state.db, foreign).unwrap();

        assert!(matches!(start_campaign(&state, "c9").await, Err(AppError::NotFound(_))));
        assert!(matches!(start_campaign(&state, " ").await, Err(AppError::Validation(_))));
        assert_eq!(repo::get_by_id(&state.db, "c9").unwrap().status, CampaignStatus::Draft);
    }
}
