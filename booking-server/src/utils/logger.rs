//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output with `RUST_LOG` filtering
//! - Daily rotating application logs (deleted after 14 days)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging (development)
pub fn init_logger() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Initialize logging with a daily rotating file appender (production)
///
/// Console output stays enabled alongside the file layer. The returned
/// guard must be held for the lifetime of the process, or buffered log
/// lines are lost on shutdown.
pub fn init_logger_with_file(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    let app_log_dir = log_dir.join("app");
    fs::create_dir_all(&app_log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(writer),
        )
        .init();

    tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

    Ok(guard)
}

/// Clean up old application log files (older than 14 days)
///
/// Call this periodically (e.g., daily) to maintain log size
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(14);

    let app_log_dir = log_dir.join("app");
    if app_log_dir.exists() {
        for entry in fs::read_dir(app_log_dir)? {
            let entry = entry?;
            let path = entry.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                // Match app.YYYY-MM-DD pattern produced by the daily appender
                if let Some(date_part) = name.strip_prefix("app.")
                    && let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                    && let Some(local_datetime) = Local
                        .from_local_datetime(&naive_date.and_hms_opt(0, 0, 0).unwrap())
                        .single()
                    && local_datetime < cutoff
                {
                    fs::remove_file(&path)?;
                    tracing::info!(file = %name, "Deleted old log file");
                }
            }
        }
    }

    Ok(())
}

/// Run log cleanup once a day
async fn periodic_cleanup(log_dir: PathBuf) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
    loop {
        interval.tick().await;
        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::warn!("Log cleanup failed: {}", e);
        }
    }
}
