//! Action triggers: the external processing steps behind the dashboard.
//!
//! Verification, rendering and campaign launch are owned by an automation
//! backend. Callers only see [`ActionTriggers`]; the backing strategy is
//! chosen from configuration:
//!
//! - [`MockTriggers`] waits a fixed interval and then writes the outcome
//!   locally. Used for demos and tests.
//! - [`WebhookTriggers`] posts to the automation webhook and writes the
//!   outcome once the backend accepts the job.
//!
//! No trigger is cancellable. A pending trigger still writes its status
//! once its wait finishes, even if the caller is gone.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::{AppConfig, TriggerMode};
use crate::db::models::{
    Avatar, CampaignStatus, CampaignUpdate, Lead, LeadStatus, VideoStatus, VideoUpdate,
};
use crate::db::repos::{campaigns, leads, videos};
use crate::db::DbPool;
use crate::error::AppError;

/// Media reference assigned to a finished render until a real one exists.
pub const PLACEHOLDER_VIDEO_URL: &str = "https://example.com/video.mp4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriggerOutcome {
    pub success: bool,
}

impl TriggerOutcome {
    pub const OK: TriggerOutcome = TriggerOutcome { success: true };
}

// ── Trait ──────────────────────────────────────────────────────────

#[async_trait]
pub trait ActionTriggers: Send + Sync {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Verify the given leads' email addresses; every lead ends `verified`.
    async fn verify_leads(&self, leads: &[Lead]) -> Result<TriggerOutcome, AppError>;

    /// Render a video; it ends `completed` with a media reference.
    async fn generate_video(
        &self,
        video_id: &str,
        script: &str,
        avatar: Avatar,
    ) -> Result<TriggerOutcome, AppError>;

    /// Start sending a campaign; it ends `running`.
    async fn launch_campaign(&self, campaign_id: &str) -> Result<TriggerOutcome, AppError>;
}

/// Build the trigger strategy selected by `config.trigger_mode`.
pub fn from_config(config: &AppConfig, pool: DbPool) -> Arc<dyn ActionTriggers> {
    match config.trigger_mode {
        TriggerMode::Mock => Arc::new(MockTriggers::new(pool, config.verify_delay, config.render_delay)),
        TriggerMode::Webhook => Arc::new(WebhookTriggers::new(pool, config.api_base_url.clone())),
    }
}

// ── Shared completion writes ───────────────────────────────────────

fn mark_verified(pool: &DbPool, input: &[Lead]) -> Result<(), AppError> {
    let ids: Vec<String> = input.iter().map(|lead| lead.id.clone()).collect();
    let n = leads::set_status_many(pool, &ids, LeadStatus::Verified)?;
    tracing::info!(requested = ids.len(), updated = n, "Leads verified");
    Ok(())
}

fn mark_rendered(pool: &DbPool, video_id: &str) -> Result<(), AppError> {
    videos::update_by_id(
        pool,
        video_id,
        VideoUpdate {
            status: Some(VideoStatus::Completed),
            video_url: Some(Some(PLACEHOLDER_VIDEO_URL.to_string())),
            ..Default::default()
        },
    )?;
    tracing::info!(video_id, "Video render completed");
    Ok(())
}

fn mark_running(pool: &DbPool, campaign_id: &str) -> Result<(), AppError> {
    campaigns::update_by_id(pool, campaign_id, CampaignUpdate::status(CampaignStatus::Running))?;
    tracing::info!(campaign_id, "Campaign running");
    Ok(())
}

// ── Mock ───────────────────────────────────────────────────────────

/// Fixed-delay simulation. Never fails on its own; only storage errors
/// propagate.
pub struct MockTriggers {
    pool: DbPool,
    verify_delay: Duration,
    render_delay: Duration,
}

impl MockTriggers {
    pub fn new(pool: DbPool, verify_delay: Duration, render_delay: Duration) -> Self {
        Self { pool, verify_delay, render_delay }
    }
}

#[async_trait]
impl ActionTriggers for MockTriggers {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn verify_leads(&self, leads: &[Lead]) -> Result<TriggerOutcome, AppError> {
        tracing::info!(count = leads.len(), "Triggering email verification");
        tokio::time::sleep(self.verify_delay).await;
        mark_verified(&self.pool, leads)?;
        Ok(TriggerOutcome::OK)
    }

    async fn generate_video(
        &self,
        video_id: &str,
        script: &str,
        avatar: Avatar,
    ) -> Result<TriggerOutcome, AppError> {
        tracing::info!(video_id, avatar = avatar.as_id(), script_len = script.len(), "Triggering video generation");
        tokio::time::sleep(self.render_delay).await;
        mark_rendered(&self.pool, video_id)?;
        Ok(TriggerOutcome::OK)
    }

    async fn launch_campaign(&self, campaign_id: &str) -> Result<TriggerOutcome, AppError> {
        tracing::info!(campaign_id, "Triggering campaign");
        mark_running(&self.pool, campaign_id)?;
        Ok(TriggerOutcome::OK)
    }
}

// ── Webhook ────────────────────────────────────────────────────────

/// Convert any displayable error into `AppError::Trigger`.
fn trigger_err(e: impl std::fmt::Display) -> AppError {
    AppError::Trigger(e.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyLeadsBody<'a> {
    leads: Vec<VerifyLeadItem<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyLeadItem<'a> {
    id: &'a str,
    email: &'a str,
    domain: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoBody<'a> {
    video_id: &'a str,
    script: &'a str,
    avatar: Avatar,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LaunchCampaignBody<'a> {
    campaign_id: &'a str,
}

/// HTTP client for the automation webhook. A status write only happens
/// after the backend answers 2xx.
pub struct WebhookTriggers {
    pool: DbPool,
    http: reqwest::Client,
    base_url: String,
}

impl WebhookTriggers {
    /// The underlying `reqwest::Client` is configured with a 30-second timeout.
    pub fn new(pool: DbPool, base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            pool,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` as JSON and require a 2xx response; the body is ignored.
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "Calling automation webhook");
        self.http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(trigger_err)?
            .error_for_status()
            .map_err(trigger_err)?;
        Ok(())
    }
}

#[async_trait]
impl ActionTriggers for WebhookTriggers {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn verify_leads(&self, leads: &[Lead]) -> Result<TriggerOutcome, AppError> {
        let body = VerifyLeadsBody {
            leads: leads
                .iter()
                .map(|l| VerifyLeadItem { id: &l.id, email: &l.email, domain: &l.domain })
                .collect(),
        };
        self.post("/verify-emails", &body).await?;
        mark_verified(&self.pool, leads)?;
        Ok(TriggerOutcome::OK)
    }

    async fn generate_video(
        &self,
        video_id: &str,
        script: &str,
        avatar: Avatar,
    ) -> Result<TriggerOutcome, AppError> {
        self.post("/generate-video", &GenerateVideoBody { video_id, script, avatar }).await?;
        mark_rendered(&self.pool, video_id)?;
        Ok(TriggerOutcome::OK)
    }

    async fn launch_campaign(&self, campaign_id: &str) -> Result<TriggerOutcome, AppError> {
        self.post("/launch-campaign", &LaunchCampaignBody { campaign_id }).await?;
        mark_running(&self.pool, campaign_id)?;
        Ok(TriggerOutcome::OK)
    }
}
