//! agrilink-server: HTTP front for the trip ledger
//!
//! Configuration is read from the YAML file named by the first argument or
//! `AGRILINK_CONFIG`; without either the built-in defaults apply.

use agrilink::config::LedgerConfig;
use agrilink::server::{AppState, serve};
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agrilink=info,tower_http=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AGRILINK_CONFIG").ok());

    let config = match &config_path {
        Some(path) => LedgerConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => {
            tracing::info!("no configuration file given, using defaults");
            LedgerConfig::default()
        }
    };

    tracing::info!(
        bind = %config.server.bind,
        default_rate_per_unit = config.pricing.default_rate_per_unit,
        "starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    serve(AppState::in_memory(config))
        .await
        .context("server terminated with an error")?;

    Ok(())
}
