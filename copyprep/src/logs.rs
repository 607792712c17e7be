//! Logging setup and pipeline log helpers.
//!
//! Everything goes to stderr through `tracing`; stdout is reserved for the
//! single confirmation line printed by the binary.
//!
//! # Levels
//!
//! - `warn`: default, only problems are shown (e.g. undecodable bytes)
//! - `info`: pipeline stage progress and counts (`-v`)
//! - `debug`: per-row collapses (`-vv`)
//! - `trace`: per-row padding (`-vvv`)

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive that overrides `-v`.
pub const LOG_ENV: &str = "COPYPREP_LOG";

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    /// Include the module path in each line.
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map a `-v` count to a level: 0 warn, 1 info, 2 debug, 3+ trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

pub fn log_info(msg: impl AsRef<str>) {
    tracing::info!("{}", msg.as_ref());
}

pub fn log_success(msg: impl AsRef<str>) {
    tracing::info!(status = "ok", "{}", msg.as_ref());
}

pub fn log_warning(msg: impl AsRef<str>) {
    tracing::warn!("{}", msg.as_ref());
}
