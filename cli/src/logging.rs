//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/lucky-draw/lucky-draw.log` (or platform
//! equivalent) with 10 MB size-based rotation. The terminal only sees
//! warnings so the prompt stays readable.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that MUST be held for the application lifetime
/// to ensure all buffered logs are flushed on shutdown.
///
/// # Behavior
/// - **File output:** INFO+ by default, DEBUG+ for lucky-draw crates when `debug_logging` is set
/// - **Stderr output:** WARN+ only
/// - **Rotation:** Size-based at 10 MB, keeps only latest rotated file
///
/// # Fallback
/// If the log directory cannot be created, returns `None` and logs to stderr only.
pub fn init(debug_logging: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("lucky-draw"),
        None => {
            init_stderr_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("lucky-draw.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1, // lucky-draw.log and lucky-draw.log.1
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(
        log_file = ?log_path,
        debug_logging,
        "Lucky draw logging initialized"
    );

    Some(guard)
}

/// Fallback when file logging is unavailable
fn init_stderr_only(debug_logging: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(debug_logging, "Lucky draw logging initialized (stderr only)");
}

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,lucky_draw_core=debug,lucky_draw_cli=debug,lucky_draw=debug"
    } else {
        "info"
    }
}
