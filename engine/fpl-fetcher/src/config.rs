//! Configuration for the FPL fetcher

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the FPL API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Base URL of the FPL API
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// TTL for bootstrap-static (season metadata, changes rarely)
    pub bootstrap_ttl: Duration,

    /// TTL for per-gameweek fixtures
    pub fixtures_ttl: Duration,

    /// TTL for live event point totals
    pub event_live_ttl: Duration,

    /// TTL for per-manager picks
    pub picks_ttl: Duration,

    /// Lead window before the deadline during which a gameweek already
    /// counts as started for announcement purposes
    pub deadline_lead: Duration,

    /// Maximum concurrent picks fetches per scoring pass
    pub picks_concurrency: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fantasy.premierleague.com/api".to_string(),
            request_timeout: Duration::from_secs(8),
            bootstrap_ttl: Duration::from_secs(12 * 60 * 60), // 12 hours
            fixtures_ttl: Duration::from_secs(30),
            event_live_ttl: Duration::from_secs(10),
            picks_ttl: Duration::from_secs(10),
            deadline_lead: Duration::from_secs(12 * 60 * 60), // 12 hours
            picks_concurrency: 8,
        }
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("FPL_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("FPL_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(concurrency) = std::env::var("FPL_PICKS_CONCURRENCY") {
            if let Ok(limit) = concurrency.parse::<usize>() {
                config.picks_concurrency = limit.max(1);
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = FetcherConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert!(config.bootstrap_ttl > config.fixtures_ttl);
        assert!(config.picks_concurrency >= 1);
    }
}
