#![forbid(unsafe_code)]

//! tracing subscriber setup for the binary.
//!
//! Logs never go to stdout: the REPL and the JSON-RPC server both own it.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{DEFAULT_LOG_LEVEL, LoggingConfig};

pub const LOG_ENV_VAR: &str = "RECKON_LOG";

/// Filter from `RECKON_LOG` if set, else `level`.
pub fn build_filter(level: &str) -> EnvFilter {
    build_filter_from(std::env::var(LOG_ENV_VAR).ok().as_deref(), level)
}

/// `env_value` wins over `level` when it parses. An unparsable `level`
/// falls back to `warn`.
pub fn build_filter_from(env_value: Option<&str>, level: &str) -> EnvFilter {
    env_value
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Open `path` for appending without rotation. Fails instead of panicking
/// when the directory cannot be created or the file cannot be opened.
pub fn open_log_file(path: &Path) -> io::Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file path {} has no file name", path.display()),
        )
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy().into_owned())
        .build(dir)
        .map_err(io::Error::other)
}

/// Writer for the configured destination. A log file that cannot be opened
/// is reported once and replaced by stderr.
pub fn make_writer(config: &LoggingConfig) -> (BoxMakeWriter, Option<WorkerGuard>) {
    let Some(file) = &config.file else {
        return (BoxMakeWriter::new(io::stderr), None);
    };

    match open_log_file(file) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        Err(err) => {
            eprintln!(
                "Warning: cannot open log file {}: {err}. Logging to stderr.",
                file.display()
            );
            (BoxMakeWriter::new(io::stderr), None)
        }
    }
}

/// Install the global subscriber. The returned guard flushes the log file
/// on drop and must be held until exit.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = build_filter(&config.level);
    let (writer, guard) = make_writer(config);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(guard.is_none())
        .try_init();
    installed.ok().and(guard)
}
