use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Global crash log directory, set during init.
static CRASH_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Keeps the file writer flushing for the life of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with stdout, rolling file and Sentry layers.
///
/// - Stdout: compact, human-readable for the dev console
/// - File: daily-rolling `outreach.log` under `log_dir`
/// - Sentry: captures ERROR events as issues, WARN as breadcrumbs
/// - Default level: INFO, override via RUST_LOG env
pub fn init(log_dir: &Path) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,outreach_desktop=debug,app_lib=debug"));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let file_layer = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, "outreach.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
        }
        Err(e) => {
            eprintln!("[logging] file logging disabled, cannot create {}: {}", log_dir.display(), e);
            None
        }
    };

    // No-op when Sentry DSN is not configured.
    let sentry_layer = sentry_tracing::layer().event_filter(|meta| match *meta.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .with(sentry_layer)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(log_dir = %log_dir.display(), "Tracing initialized");
    }
}

/// Install a panic hook that writes a crash report under
/// `data_dir/crash_logs` before the previous hook runs.
pub fn install_crash_hook(data_dir: &Path) {
    let crash_dir = data_dir.join("crash_logs");
    let _ = std::fs::create_dir_all(&crash_dir);
    if CRASH_LOG_DIR.set(crash_dir).is_err() {
        return;
    }

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(dir) = CRASH_LOG_DIR.get() {
            let now = chrono::Local::now();
            let path = dir.join(format!("crash_{}.log", now.format("%Y%m%d_%H%M%S")));

            let payload = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned());
            let location = info
                .location()
                .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));

            let mut report = crash_report(&now.to_rfc3339(), payload.as_deref(), location.as_deref());
            report.push_str(&format!("\nBacktrace:\n{}\n", std::backtrace::Backtrace::force_capture()));

            let _ = std::fs::write(&path, &report);
            eprintln!("[CRASH] Report written to: {}", path.display());
        }

        prev_hook(info);
    }));

    tracing::info!("Crash hook installed");
}

fn crash_report(time: &str, payload: Option<&str>, location: Option<&str>) -> String {
    let mut report = format!(
        "=== OUTREACH DESK CRASH REPORT ===\nTime: {}\nVersion: {}\n\nPanic: {}\n",
        time,
        env!("CARGO_PKG_VERSION"),
        payload.unwrap_or("<unknown payload>"),
    );
    if let Some(loc) = location {
        report.push_str(&format!("Location: {loc}\n"));
    }
    report
}

/// Read crash logs from disk (most recent first, max 10).
pub fn read_crash_logs(data_dir: &Path) -> Vec<CrashLogEntry> {
    let crash_dir = data_dir.join("crash_logs");
    let mut entries = Vec::new();

    if let Ok(dir) = std::fs::read_dir(&crash_dir) {
        for entry in dir.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "log").unwrap_or(false) {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    entries.push(CrashLogEntry {
                        filename: path.file_name().unwrap_or_default().to_string_lossy().into(),
                        content,
                    });
                }
            }
        }
    }

    // Filenames embed the timestamp, so descending name order is newest first.
    entries.sort_by(|a, b| b.filename.cmp(&a.filename));
    entries.truncate(10);
    entries
}

#[derive(Debug, Clone, serde::Serialize, ts_rs::TS)]
#[ts(export)]
pub struct CrashLogEntry {
    pub filename: String,
    pub content: String,
}
