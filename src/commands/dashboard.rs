use crate::db::models::DashboardSummary;
use crate::db::repos::activities;
use crate::engine::analytics;
use crate::error::AppError;
use crate::AppState;

/// Headline counts, engagement rates and the latest activity for the
/// signed-in user.
pub fn dashboard_summary(state: &AppState) -> Result<DashboardSummary, AppError> {
    let user = state.auth.require_user()?;
    let analytics = analytics::compute_analytics(&state.db, &user.id, state.engagement.as_ref())?;
    let recent_activities = activities::get_recent_for(&state.db, &user.id)?;
    Ok(DashboardSummary { analytics, recent_activities })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::leads;
    use crate::db::models::{ActivityType, LeadStatus};
    use crate::db::repos::leads as lead_repo;
    use crate::test_support::signed_in_state;

    #[tokio::test]
    async fn test_jane_scenario() {
        let (state, _dir) = signed_in_state().await;
        let uploaded = leads::upload_leads(
            &state,
            "name,email,company,domain\nJane,jane@x.com,Acme,x.com\nBob,,Acme,x.com",
        )
        .unwrap();
        assert_eq!(uploaded.len(), 1);
        assert_eq!(uploaded[0].name, "Jane");
        assert_eq!(uploaded[0].status, LeadStatus::Uploaded);

        let summary = dashboard_summary(&state).unwrap();
        assert_eq!(summary.analytics.total_leads, 1);
        assert_eq!(summary.analytics.verified_emails, 0);
        assert_eq!(summary.recent_activities[0].message, "Uploaded 1 leads");

        leads::verify_uploaded_leads(&state).await.unwrap();
        assert_eq!(lead_repo::get_by_id(&state.db, &uploaded[0].id).unwrap().status, LeadStatus::Verified);

        let summary = dashboard_summary(&state).unwrap();
        assert_eq!(summary.analytics.verified_emails, 1);
        assert_eq!(summary.recent_activities[0].activity_type, ActivityType::LeadVerified);
        // No campaigns yet, so no engagement
        assert_eq!(summary.analytics.email_open_rate, 0);
    }

    #[tokio::test]
    async fn test_feed_is_capped() {
        let (state, _dir) = signed_in_state().await;
        for i in 0..12 {
            leads::upload_leads(&state, &format!("name,email,company,domain\nL,l{i}@x.com,C,x.com")).unwrap();
        }
        let summary = dashboard_summary(&state).unwrap();
        assert_eq!(summary.recent_activities.len(), activities::RECENT_LIMIT);
        assert_eq!(summary.analytics.total_leads, 12);
    }
}
