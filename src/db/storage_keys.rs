/// Canonical keys for the `kv_store` table.
///
/// Use these instead of raw string literals to prevent typo-based key mismatches.
/// The values match what the dashboard has always written, so existing data
/// keeps loading.

/// The signed-in user profile (single record).
pub const SESSION: &str = "hiring_ai_auth";

/// Registered accounts: `{ [email]: { credential, user } }`.
pub const USERS: &str = "hiring_ai_users";

pub const LEADS: &str = "hiring_ai_leads";
pub const VIDEOS: &str = "hiring_ai_videos";
pub const CAMPAIGNS: &str = "hiring_ai_campaigns";
pub const ACTIVITIES: &str = "hiring_ai_activities";
