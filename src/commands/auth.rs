use serde::Deserialize;
use ts_rs::TS;

use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub fn get_session(state: &AppState) -> Result<Option<User>, AppError> {
    state.auth.current_session()
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<User, AppError> {
    state.auth.login(email, password).await
}

pub async fn signup(state: &AppState, input: SignupInput) -> Result<User, AppError> {
    state.auth.signup(&input.email, &input.password, &input.name).await
}

pub async fn login_with_demo_provider(state: &AppState) -> Result<User, AppError> {
    state.auth.login_with_demo_provider().await
}

pub fn logout(state: &AppState) -> Result<(), AppError> {
    state.auth.logout()
}

pub async fn request_password_reset(state: &AppState, email: &str) -> Result<(), AppError> {
    state.auth.request_password_reset(email).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{dashboard, leads};
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_sessions_scope_data() {
        let (state, _dir) = test_state();
        let jane = signup(
            &state,
            SignupInput { email: "jane@x.com".into(), password: "pw".into(), name: "Jane".into() },
        )
        .await
        .unwrap();
        leads::upload_leads(&state, "name,email,company,domain\nA,a@x.com,C,x.com").unwrap();
        logout(&state).unwrap();
        assert_eq!(get_session(&state).unwrap(), None);

        login_with_demo_provider(&state).await.unwrap();
        assert!(leads::list_leads(&state, None).unwrap().is_empty());
        assert_eq!(dashboard::dashboard_summary(&state).unwrap().analytics.total_leads, 0);

        let again = login(&state, "jane@x.com", "pw").await.unwrap();
        assert_eq!(again.id, jane.id);
        assert_eq!(leads::list_leads(&state, None).unwrap().len(), 1);
    }
}
