//! Console plus daily-rotated file logging.

use crate::config::Settings;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background file writer alive; dropping it flushes and stops
/// file logging, so hold it for the lifetime of the process.
pub struct LoggerGuard {
    _guard: WorkerGuard,
}

impl LoggerGuard {
    pub fn setup(settings: &Settings) -> Self {
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &settings.log_dir, &settings.log_file);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        // RUST_LOG wins over TT_LOG_LEVEL.
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_target(true);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::info!(
            target = "startup",
            directory = %settings.log_dir,
            file = %settings.log_file,
            "logging initialised"
        );

        Self { _guard: guard }
    }
}
