// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize Sentry before anything else so panics during startup are captured.
    // Returns a no-op guard when SENTRY_DSN is absent (local dev).
    let _sentry_guard = sentry::init(sentry_options());

    match app_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "Startup failed: {}", e);
            eprintln!("outreach-desktop: {e}");
            ExitCode::FAILURE
        }
    }
}

fn sentry_options() -> sentry::ClientOptions {
    sentry::ClientOptions {
        dsn: option_env!("SENTRY_DSN").and_then(|s| s.parse().ok()),
        release: Some(concat!("outreach-desktop@", env!("CARGO_PKG_VERSION")).into()),
        traces_sample_rate: 0.0,
        send_default_pii: false,
        // Lead and account emails must never leave the machine.
        before_send: Some(std::sync::Arc::new(|mut event| {
            if let Some(ref mut user) = event.user {
                user.email = None;
                user.ip_address = None;
                user.username = None;
            }
            if let Some(ref mut request) = event.request {
                request.data = None;
            }
            Some(event)
        })),
        ..Default::default()
    }
}
