//! Process-wide logging to an append-mode file
//!
//! Lines look like `2024-11-02T10:15:30.123Z - INFO - CSV file loaded successfully.`
//! The level defaults to `info` (`debug` with `--debug`) and can be
//! overridden with the `LOG_LEVEL` environment variable.

use eyre::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Marks the end of the logging scope
///
/// Records reach the file unbuffered as they are logged. Dropping the
/// guard calls `log::logger().flush()`, which matters only for loggers
/// that buffer.
#[must_use = "dropping the guard ends the logging scope immediately"]
pub struct LogGuard {
    _private: (),
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

/// Install the global logger, appending to `path`
///
/// Call once at process start. A second call fails because the global
/// logger is already set.
pub fn init(path: impl AsRef<Path>, debug: bool) -> Result<LogGuard> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let log_level = match debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .context("Logger already initialized")?;

    Ok(LogGuard { _private: () })
}
