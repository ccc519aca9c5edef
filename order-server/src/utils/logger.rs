//! Logging Infrastructure
//!
//! `tracing-subscriber` with an env filter, optional JSON output and an
//! optional daily rolling file under `LOG_DIR`.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// File name prefix for rolled log files
const LOG_FILE_PREFIX: &str = "order-server";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON formatting and file output
///
/// `RUST_LOG`, when set, wins over `log_level`. A second call is a no-op.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let filter = build_filter(log_level.unwrap_or("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir.and_then(|dir| {
        let path = Path::new(dir);
        match std::fs::create_dir_all(path) {
            Ok(()) => Some(tracing_appender::rolling::daily(path, LOG_FILE_PREFIX)),
            Err(e) => {
                eprintln!("Cannot create log dir {}: {}, logging to stdout", dir, e);
                None
            }
        }
    });

    let result = match (json.unwrap_or(false), file_appender) {
        (true, Some(writer)) => builder.json().with_writer(writer).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(writer)) => builder.with_ansi(false).with_writer(writer).try_init(),
        (false, None) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}

/// Level filter with the chattier dependencies turned down
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn,tower_http=info")))
}
