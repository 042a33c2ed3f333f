//! Service configuration management

use anyhow::{Context, Result};
use fpl_fetcher::FetcherConfig;
use std::path::PathBuf;

/// Main service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address for the HTTP server
    pub host: String,

    /// Bind port for the HTTP server
    pub port: u16,

    /// Directory holding league data files and the result store
    pub data_dir: PathBuf,

    /// Gameweek of the baseline standings snapshot; standings replay starts
    /// one gameweek after this
    pub baseline_gw: u32,

    /// Upstream FPL client configuration
    pub fetcher: FetcherConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            baseline_gw: 27,
            fetcher: FetcherConfig::default(),
        }
    }
}

/// Load configuration from environment variables
pub fn load_config() -> Result<ServiceConfig> {
    let mut config = ServiceConfig::default();

    if let Ok(host) = std::env::var("TVT_HOST") {
        config.host = host;
    }

    if let Ok(port) = std::env::var("TVT_PORT") {
        config.port = port.parse().context("TVT_PORT must be a port number")?;
    }

    if let Ok(data_dir) = std::env::var("TVT_DATA_DIR") {
        config.data_dir = PathBuf::from(data_dir);
    }

    if let Ok(baseline_gw) = std::env::var("TVT_BASELINE_GW") {
        config.baseline_gw = baseline_gw.parse().context("TVT_BASELINE_GW must be a gameweek")?;
    }

    config.fetcher = FetcherConfig::from_env();

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration
fn validate_config(config: &ServiceConfig) -> Result<()> {
    if config.port == 0 {
        return Err(anyhow::anyhow!("Invalid port: {}", config.port));
    }

    if config.baseline_gw == 0 || config.baseline_gw > 38 {
        return Err(anyhow::anyhow!("Invalid baseline gameweek: {}", config.baseline_gw));
    }

    if !config.data_dir.exists() {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", config.data_dir))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.baseline_gw, 27);
        assert!(config.baseline_gw <= 38);
    }
}
