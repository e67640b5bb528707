//! Shared logging bootstrap for schemabridge binaries.

use crate::{Error, Result};

use tracing::{info, Level};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
        }
    }

    /// Read `LOG_FORMAT` from the environment, defaulting to JSON.
    pub fn from_env() -> Result<Self> {
        match std::env::var("LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw),
            Err(_) => Ok(LogFormat::Json),
        }
    }
}

/// Install the global tracing subscriber for a binary.
///
/// `RUST_LOG` directives take precedence over `log_level` when set.
pub fn init_logging(component: &str, log_level: &str) -> Result<()> {
    let level = parse_log_level(log_level)?;
    let format = LogFormat::from_env()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed
        .map_err(|e| Error::Config(format!("failed to initialize logging subscriber: {e}")))?;

    info!(
        component = %component,
        log_level = %level,
        log_format = format.as_str(),
        "Logging initialized"
    );
    Ok(())
}

pub fn parse_log_level(raw: &str) -> Result<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(Error::Config(format!(
            "invalid log level '{other}', expected one of [trace, debug, info, warn, error]"
        ))),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "text" | "pretty" => Ok(LogFormat::Text),
        other => Err(Error::Config(format!(
            "LOG_FORMAT must be one of [json, text], got '{other}'"
        ))),
    }
}
