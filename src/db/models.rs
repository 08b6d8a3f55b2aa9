use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Always stored lower-cased; doubles as the login key.
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            id: new_id(),
            email: email.trim().to_lowercase(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Leads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Uploaded,
    Processing,
    Verified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub domain: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// A freshly uploaded lead, not yet verified.
    pub fn new(user_id: &str, name: String, email: String, company: String, domain: String) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name,
            email,
            company,
            domain,
            status: LeadStatus::Uploaded,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub domain: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    pub fn status(status: LeadStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

// ============================================================================
// Videos
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Presenter presets offered for generated videos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Avatar {
    #[default]
    ProfessionalMale,
    ProfessionalFemale,
    CasualMale,
    CasualFemale,
    CorporateMale,
    CorporateFemale,
}

impl Avatar {
    pub const ALL: [Avatar; 6] = [
        Avatar::ProfessionalMale,
        Avatar::ProfessionalFemale,
        Avatar::CasualMale,
        Avatar::CasualFemale,
        Avatar::CorporateMale,
        Avatar::CorporateFemale,
    ];

    /// Identifier as stored and sent to the rendering backend.
    pub fn as_id(&self) -> &'static str {
        match self {
            Avatar::ProfessionalMale => "professional-male",
            Avatar::ProfessionalFemale => "professional-female",
            Avatar::CasualMale => "casual-male",
            Avatar::CasualFemale => "casual-female",
            Avatar::CorporateMale => "corporate-male",
            Avatar::CorporateFemale => "corporate-female",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Avatar::ProfessionalMale => "Professional Male",
            Avatar::ProfessionalFemale => "Professional Female",
            Avatar::CasualMale => "Casual Male",
            Avatar::CasualFemale => "Casual Female",
            Avatar::CorporateMale => "Corporate Male",
            Avatar::CorporateFemale => "Corporate Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub script: String,
    pub avatar: Avatar,
    pub status: VideoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// A video whose rendering has been requested but not finished.
    pub fn processing(user_id: &str, name: String, script: String, avatar: Avatar) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name,
            script,
            avatar,
            status: VideoStatus::Processing,
            video_url: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VideoUpdate {
    pub name: Option<String>,
    pub script: Option<String>,
    pub avatar: Option<Avatar>,
    pub status: Option<VideoStatus>,
    pub video_url: Option<Option<String>>,
}

/// One row of an uploaded script sheet, waiting to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingScript {
    pub name: String,
    pub script: String,
}

// ============================================================================
// Campaigns
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Snapshot taken at creation; later lead changes do not alter membership.
    pub lead_ids: Vec<String>,
    pub video_id: String,
    pub status: CampaignStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// `lead_ids` is intentionally absent: membership is frozen at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CampaignUpdate {
    pub name: Option<String>,
    pub video_id: Option<String>,
    pub status: Option<CampaignStatus>,
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
}

impl CampaignUpdate {
    pub fn status(status: CampaignStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

/// Which of the user's verified leads a new campaign targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LeadSelection {
    #[default]
    All,
    /// The ten oldest verified leads.
    FirstTen,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignInput {
    pub name: String,
    pub video_id: String,
    #[serde(default)]
    pub lead_selection: LeadSelection,
    pub scheduled_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Activities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    LeadUploaded,
    LeadVerified,
    VideoCreated,
    CampaignStarted,
    CampaignCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

impl Activity {
    pub fn new(user_id: &str, activity_type: ActivityType, message: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            activity_type,
            message: message.into(),
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
        }
    }
}

// ============================================================================
// Analytics (derived, never stored)
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRates {
    pub email_open_rate: u32,
    pub video_watch_rate: u32,
    pub reply_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_leads: u32,
    pub verified_emails: u32,
    pub active_campaigns: u32,
    pub videos_generated: u32,
    pub email_open_rate: u32,
    pub video_watch_rate: u32,
    pub reply_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub analytics: Analytics,
    /// Newest first, at most ten.
    pub recent_activities: Vec<Activity>,
}
