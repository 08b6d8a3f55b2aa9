//! Dashboard analytics.
//!
//! Counts come straight from the repositories. Engagement percentages have
//! no backing data yet; they come from an [`EngagementSource`] so a real
//! metrics pipeline can replace the random placeholder without touching
//! callers.

use rand::Rng;

use crate::db::models::{Analytics, CampaignStatus, EngagementRates, LeadStatus};
use crate::db::repos::{campaigns, leads, videos};
use crate::db::DbPool;
use crate::error::AppError;

pub trait EngagementSource: Send + Sync {
    fn rates(&self, user_id: &str) -> EngagementRates;
}

/// Placeholder rates drawn uniformly per read:
/// open 20–60 %, watch 15–45 %, reply 5–20 %.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomEngagement;

impl EngagementSource for RandomEngagement {
    fn rates(&self, _user_id: &str) -> EngagementRates {
        let mut rng = rand::thread_rng();
        EngagementRates {
            email_open_rate: rng.gen_range(20..=60),
            video_watch_rate: rng.gen_range(15..=45),
            reply_rate: rng.gen_range(5..=20),
        }
    }
}

/// Always reports the same rates. For demos and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedEngagement(pub EngagementRates);

impl EngagementSource for FixedEngagement {
    fn rates(&self, _user_id: &str) -> EngagementRates {
        self.0
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

pub fn compute_analytics(
    pool: &DbPool,
    user_id: &str,
    source: &dyn EngagementSource,
) -> Result<Analytics, AppError> {
    let user_leads = leads::get_all_for(pool, user_id)?;
    let user_videos = videos::get_all_for(pool, user_id)?;
    let user_campaigns = campaigns::get_all_for(pool, user_id)?;

    let verified = user_leads.iter().filter(|l| l.status == LeadStatus::Verified).count();
    let running = user_campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Running)
        .count();

    // Engagement only makes sense once something has been sent.
    let rates = if user_campaigns.is_empty() {
        EngagementRates::default()
    } else {
        source.rates(user_id)
    };

    Ok(Analytics {
        total_leads: count(user_leads.len()),
        verified_emails: count(verified),
        active_campaigns: count(running),
        videos_generated: count(user_videos.len()),
        email_open_rate: rates.email_open_rate,
        video_watch_rate: rates.video_watch_rate,
        reply_rate: rates.reply_rate,
    })
}
