use serde::Serialize;
use ts_rs::TS;

use crate::config::{TriggerMode, DEFAULT_API_URL};
use crate::error::AppError;
use crate::logging::{self, CrashLogEntry};
use crate::AppState;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct HealthCheckItem {
    pub id: String,
    pub label: String,
    pub status: String,
    pub detail: Option<String>,
}

impl HealthCheckItem {
    fn new(id: &str, label: &str, status: &str, detail: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status: status.into(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SystemHealthReport {
    pub checks: Vec<HealthCheckItem>,
    pub all_ok: bool,
}

pub fn system_health_check(state: &AppState) -> Result<SystemHealthReport, AppError> {
    let mut checks = Vec::new();

    // Check 1: local store answers
    let stored = state
        .db
        .get()
        .map_err(AppError::from)
        .and_then(|conn| {
            conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get::<_, i64>(0))
                .map_err(AppError::from)
        });
    checks.push(match stored {
        Ok(n) => HealthCheckItem::new("storage", "Local storage", "ok", format!("{n} collections")),
        Err(e) => HealthCheckItem::new("storage", "Local storage", "error", e.to_string()),
    });

    // Check 2: where lead/video/campaign work goes
    let config = &state.config;
    checks.push(match config.trigger_mode {
        TriggerMode::Mock => HealthCheckItem::new(
            "triggers",
            "Automation backend",
            "ok",
            format!("{} (simulated)", state.triggers.name()),
        ),
        TriggerMode::Webhook if config.api_base_url == DEFAULT_API_URL => HealthCheckItem::new(
            "triggers",
            "Automation backend",
            "warn",
            "Webhook mode with the placeholder URL; set OUTREACH_API_URL",
        ),
        TriggerMode::Webhook => {
            HealthCheckItem::new("triggers", "Automation backend", "ok", config.api_base_url.clone())
        }
    });

    // Check 3: session
    checks.push(match state.auth.current_session()? {
        Some(user) => HealthCheckItem::new("session", "Session", "ok", user.email),
        None => HealthCheckItem::new("session", "Session", "warn", "Not signed in"),
    });

    let all_ok = checks.iter().all(|c| c.status == "ok");
    Ok(SystemHealthReport { checks, all_ok })
}

pub fn list_crash_logs(state: &AppState) -> Vec<CrashLogEntry> {
    logging::read_crash_logs(&state.config.data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{signed_in_state, test_state};

    #[test]
    fn test_system_health_report_serialization() {
        let report = SystemHealthReport {
            checks: vec![HealthCheckItem::new("a", "A", "error", "fail")],
            all_ok: false,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"all_ok\":false"));
        assert!(json.contains("\"status\":\"error\""));
    }

    #[test]
    fn test_signed_out_is_a_warning() {
        let (state, _dir) = test_state();
        let report = system_health_check(&state).unwrap();
        assert!(!report.all_ok);
        let session = report.checks.iter().find(|c| c.id == "session").unwrap();
        assert_eq!(session.status, "warn");
        let storage = report.checks.iter().find(|c| c.id == "storage").unwrap();
        assert_eq!(storage.status, "ok");
    }

    #[tokio::test]
    async fn test_healthy_when_signed_in() {
        let (state, _dir) = signed_in_state().await;
        assert!(system_health_check(&state).unwrap().all_ok);
    }

    #[test]
    fn test_no_crash_logs() {
        let (state, _dir) = test_state();
        assert!(list_crash_logs(&state).is_empty());
    }
}
