//! Structured logging setup.
//!
//! The `logging` section of [`ServerConfig`](crate::config::ServerConfig)
//! selects the output format and the default level. `RUST_LOG`, when set,
//! overrides the level.
//!
//! JSON output writes one object per line:
//!
//! ```json
//! {"timestamp":"2026-01-15T10:30:00.000Z","level":"WARN","target":"herald_domain::authz","fields":{"message":"caller is not a member of the required group"}}
//! ```

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

use crate::config::LoggingSettings;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output, for development.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: Level,
}

impl LoggingConfig {
    /// Resolves the `logging` section of the server config.
    ///
    /// An unparseable level falls back to INFO; `ServerConfig::validate`
    /// rejects those before this point.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            format: if settings.json {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
            level: Level::from_str(&settings.level).unwrap_or(Level::INFO),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }
}

/// Installs the global subscriber.
///
/// Returns false if a global subscriber was already installed, in which case
/// the existing one is kept.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder
            .json()
            .with_current_span(true)
            .with_file(false)
            .with_line_number(false)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.is_ok()
}

/// JSON subscriber at `config.level` writing to `writer`, ignoring `RUST_LOG`.
pub fn json_subscriber<W>(config: &LoggingConfig, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(true)
        .json()
        .with_current_span(true)
        .with_writer(writer)
        .finish()
}
