//! TVT League Service
//!
//! Entry point for the league scoring service: loads configuration and the
//! league data files, builds the shared state and serves the REST API.

use anyhow::{Context, Result};
use std::net::IpAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tvt_league_service::rest_api::create_routes;
use tvt_league_service::{load_config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting TVT League Service v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded; data dir {:?}", config.data_dir);

    let host: IpAddr = config.host.parse().context("Invalid bind address")?;
    let port = config.port;

    let state = AppState::new(config).context("Failed to initialize service state")?;
    let routes = create_routes(state);

    info!("TVT League Service listening on {}:{}", host, port);
    warp::serve(routes).run((host, port)).await;

    Ok(())
}
