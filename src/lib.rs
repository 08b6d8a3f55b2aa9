pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod validation;

use std::sync::Arc;

use config::AppConfig;
use db::DbPool;
use engine::analytics::{EngagementSource, RandomEngagement};
use engine::auth::AuthService;
use engine::triggers::{self, ActionTriggers};
use error::AppError;

/// Shared application state handed to every command.
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    /// Backend for lead verification, video rendering and campaign launch.
    pub triggers: Arc<dyn ActionTriggers>,
    pub auth: AuthService,
    /// Placeholder engagement figures until real tracking exists.
    pub engagement: Arc<dyn EngagementSource>,
}

impl AppState {
    /// Open the store under `config.data_dir` and wire the configured backends.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let db = db::init_db(&config.data_dir)?;
        let triggers = triggers::from_config(&config, db.clone());
        let auth = AuthService::new(db.clone(), config.auth_latency);
        tracing::info!(
            trigger_mode = config.trigger_mode.as_setting(),
            api_base_url = %config.api_base_url,
            "Application state ready"
        );
        Ok(Self {
            db,
            config,
            triggers,
            auth,
            engagement: Arc::new(RandomEngagement),
        })
    }
}

/// Boot the desktop host: config, logging, storage, then restore the
/// persisted session and report health.
pub fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    logging::init(&config.log_dir());
    logging::install_crash_hook(&config.data_dir);

    tracing::info!("Starting Outreach Desk v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let state = AppState::new(config)?;

        match state.auth.current_session()? {
            Some(user) => tracing::info!(user_id = %user.id, email = %user.email, "Session restored"),
            None => tracing::info!("No saved session"),
        }

        let report = commands::system::system_health_check(&state)?;
        for check in &report.checks {
            tracing::info!(
                check = %check.id,
                status = %check.status,
                detail = check.detail.as_deref().unwrap_or(""),
                "Health check"
            );
        }

        let crashes = commands::system::list_crash_logs(&state);
        if let Some(latest) = crashes.first() {
            tracing::warn!(count = crashes.len(), latest = %latest.filename, "Previous crash reports found");
        }

        Ok(())
    })
}
