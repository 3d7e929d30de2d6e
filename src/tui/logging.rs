use std::env;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Set up file-based logging for the chat TUI
///
/// The TUI owns the terminal, so log lines go to `chat.log` inside the
/// settings directory instead of stderr.
pub fn setup_logging(settings_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let log_dir = match settings_dir {
        Some(dir) => dir,
        None => env::current_dir()?.join(".psdocs"),
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "chat.log");

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .init();

    Ok(())
}
