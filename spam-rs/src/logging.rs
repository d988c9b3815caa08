//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ServiceConfig};
use crate::error::{Result, SpamError};

/// Install the global subscriber for the service.
///
/// `RUST_LOG` wins when set; otherwise the configured level (or `debug` when
/// the debug flag is on) applies to this crate and the HTTP trace layer.
pub fn init(config: &ServiceConfig) -> Result<()> {
    let filter = default_filter(config.effective_log_level());
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
    .map_err(|e| SpamError::Config(format!("Failed to set tracing subscriber: {}", e)))
}

/// Install a compact subscriber writing to stderr, for command line tools
pub fn init_stderr(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| SpamError::Config(format!("Failed to set tracing subscriber: {}", e)))
}

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spam_rs={},tower_http={}", level, level)))
}
