use crate::db::models::{ActivityType, Lead, LeadStatus};
use crate::db::repos::{activities, leads as repo};
use crate::engine::csv_import;
use crate::engine::triggers::TriggerOutcome;
use crate::error::AppError;
use crate::AppState;

/// The user's leads, optionally narrowed by a case-insensitive match on
/// name, email or company.
pub fn list_leads(state: &AppState, search: Option<&str>) -> Result<Vec<Lead>, AppError> {
    let user = state.auth.require_user()?;
    let mut leads = repo::get_all_for(&state.db, &user.id)?;

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let term = term.to_lowercase();
        leads.retain(|lead| {
            lead.name.to_lowercase().contains(&term)
                || lead.email.to_lowercase().contains(&term)
                || lead.company.to_lowercase().contains(&term)
        });
    }
    Ok(leads)
}

/// Import a lead CSV. Nothing is stored when the header is invalid or no
/// row has an email.
pub fn upload_leads(state: &AppState, csv_text: &str) -> Result<Vec<Lead>, AppError> {
    let user = state.auth.require_user()?;
    let new_leads = csv_import::parse_leads(csv_text, &user.id)?;
    if new_leads.is_empty() {
        return Ok(new_leads);
    }

    repo::append_many(&state.db, new_leads.clone())?;
    activities::record(
        &state.db,
        &user.id,
        ActivityType::LeadUploaded,
        format!("Uploaded {} leads", new_leads.len()),
    )?;
    Ok(new_leads)
}

/// Send every `uploaded` lead through verification.
///
/// The leads are marked `processing` first so the list shows progress
/// while the trigger runs. If the trigger fails they go back to `uploaded`
/// so a later call can retry them.
pub async fn verify_uploaded_leads(state: &AppState) -> Result<TriggerOutcome, AppError> {
    let user = state.auth.require_user()?;
    let pending = repo::get_by_status(&state.db, &user.id, LeadStatus::Uploaded)?;
    if pending.is_empty() {
        return Err(AppError::Validation("No leads to verify".into()));
    }

    let ids: Vec<String> = pending.iter().map(|lead| lead.id.clone()).collect();
    repo::set_status_many(&state.db, &ids, LeadStatus::Processing)?;

    let outcome = match state.triggers.verify_leads(&pending).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(count = ids.len(), error = %e, "Verification failed, leads returned to uploaded");
            repo::set_status_many(&state.db, &ids, LeadStatus::Uploaded)?;
            return Err(e);
        }
    };

    activities::record(
        &state.db,
        &user.id,
        ActivityType::LeadVerified,
        format!("Verified {} email addresses", pending.len()),
    )?;
    Ok(outcome)
}
