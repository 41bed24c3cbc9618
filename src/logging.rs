// Logging initialisation.
//
// The terminal belongs to the UI, so logs only go to a file:
//   `{log_dir}/mindful_diary.log`
//
// The level is controlled by `RUST_LOG` (defaults to `info`).
// To enable debug output:  `RUST_LOG=debug`

use color_eyre::eyre::{Result, WrapErr};
use std::path::Path;
use tracing_appender::non_blocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Initialise the global tracing subscriber.
//
// Returns a [`WorkerGuard`] that must be kept alive until the program exits.
// Dropping it early loses buffered log lines.
pub fn init(log_dir: &Path) -> Result<non_blocking::WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("mindful_diary.log")
        .build(log_dir)
        .wrap_err_with(|| format!("creating log file in {}", log_dir.display()))?;
    let (file_writer, guard) = non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(guard)
}
