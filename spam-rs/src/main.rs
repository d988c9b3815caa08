//! spam-rs: Spam classification HTTP service
//!
//! Loads the model once at startup and serves the JSON API, the health
//! route and the form page. Configuration comes from the file given as the
//! first argument (or `SPAM_CONFIG`), then `SPAM_*` environment variables.

use spam_rs::api::ApiServer;
use spam_rs::{logging, Predictor, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SPAM_CONFIG").ok())
        .map(PathBuf::from);

    let config = ServiceConfig::load(config_path.as_deref())?;

    // Initialize logging
    logging::init(&config)?;

    info!("Starting spam-rs v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file specified, using ./config.toml if present"),
    }
    info!("  Listening on: {}", config.server.listen_addr());
    info!("  Model path: {}", config.model.path.display());
    if config.server.debug {
        warn!("Debug mode enabled");
    }

    let predictor = Arc::new(Predictor::load(&config.model.path));

    let server = ApiServer::new(predictor, config.server.listen_addr());
    server.run().await?;

    Ok(())
}
