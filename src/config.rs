use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

const ENV_DATA_DIR: &str = "OUTREACH_DATA_DIR";
const ENV_API_URL: &str = "OUTREACH_API_URL";
const ENV_TRIGGER_MODE: &str = "OUTREACH_TRIGGER_MODE";
const ENV_VERIFY_DELAY_MS: &str = "OUTREACH_VERIFY_DELAY_MS";
const ENV_RENDER_DELAY_MS: &str = "OUTREACH_RENDER_DELAY_MS";
const ENV_AUTH_LATENCY_MS: &str = "OUTREACH_AUTH_LATENCY_MS";

/// Placeholder automation webhook; never reachable in mock mode.
pub const DEFAULT_API_URL: &str = "https://your-n8n-instance.com/webhook";

const DEFAULT_VERIFY_DELAY_MS: u64 = 2_000;
const DEFAULT_RENDER_DELAY_MS: u64 = 3_000;
const DEFAULT_AUTH_LATENCY_MS: u64 = 800;

/// Which `ActionTriggers` implementation backs the lead/video/campaign flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Fixed-delay local simulation.
    Mock,
    /// HTTP calls to the automation webhook at `api_base_url`.
    Webhook,
}

impl TriggerMode {
    pub fn from_setting(s: &str) -> Result<Self, AppError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "mock" => Ok(TriggerMode::Mock),
            "webhook" => Ok(TriggerMode::Webhook),
            other => Err(AppError::Config(format!(
                "{ENV_TRIGGER_MODE} must be 'mock' or 'webhook', got '{other}'"
            ))),
        }
    }

    pub fn as_setting(&self) -> &'static str {
        match self {
            TriggerMode::Mock => "mock",
            TriggerMode::Webhook => "webhook",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_base_url: String,
    pub trigger_mode: TriggerMode,
    pub verify_delay: Duration,
    pub render_delay: Duration,
    /// Simulated round-trip for login/signup/password-reset.
    pub auth_latency: Duration,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// real environment variables win over it.
    pub fn from_env() -> Result<Self, AppError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Split out from
    /// `from_env` so parsing can be tested without touching process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(ENV_DATA_DIR).filter(|s| !s.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let api_base_url = lookup(ENV_API_URL)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        let trigger_mode = match lookup(ENV_TRIGGER_MODE) {
            Some(mode) => TriggerMode::from_setting(&mode)?,
            None => TriggerMode::Mock,
        };

        Ok(Self {
            data_dir,
            api_base_url,
            trigger_mode,
            verify_delay: millis(&lookup, ENV_VERIFY_DELAY_MS, DEFAULT_VERIFY_DELAY_MS)?,
            render_delay: millis(&lookup, ENV_RENDER_DELAY_MS, DEFAULT_RENDER_DELAY_MS)?,
            auth_latency: millis(&lookup, ENV_AUTH_LATENCY_MS, DEFAULT_AUTH_LATENCY_MS)?,
        })
    }

    /// Mock triggers with no delays, rooted at `data_dir`.
    pub fn for_tests(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            api_base_url: DEFAULT_API_URL.to_string(),
            trigger_mode: TriggerMode::Mock,
            verify_delay: Duration::ZERO,
            render_delay: Duration::ZERO,
            auth_latency: Duration::ZERO,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn default_data_dir() -> Result<PathBuf, AppError> {
    dirs::data_dir()
        .map(|d| d.join("outreach-desk"))
        .ok_or_else(|| {
            AppError::Config(format!(
                "No platform data directory available; set {ENV_DATA_DIR}"
            ))
        })
}

fn millis<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| AppError::Config(format!("{key} must be a whole number of milliseconds, got '{raw}'"))),
        None => Ok(Duration::from_millis(default)),
    }
}

/// Validate the webhook base URL and strip any trailing slash so endpoint
/// paths can be appended directly.
fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| AppError::Config(format!("{ENV_API_URL} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::Config(format!(
                "{ENV_API_URL} must use http or https, got '{other}'"
            )))
        }
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
