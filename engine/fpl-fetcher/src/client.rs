//! FPL API client
//!
//! One client instance owns the HTTP connection pool and all endpoint
//! caches. Fetches degrade rather than fail: a timeout or bad payload is
//! retried once, then the endpoint yields `None` and the caller records a
//! warning and scores with safe defaults.

use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};
use crate::config::FetcherConfig;
use crate::models::{Bootstrap, EntryEventPicks, EventLive, Fixture};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};
use tvt_scoring::models::{GameweekStatus, ManagerStats};
use tvt_scoring::warnings::Warnings;

/// Client for the upstream FPL API
pub struct FplClient {
    config: FetcherConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    bootstrap_cache: TtlCache<(), Bootstrap>,
    fixtures_cache: TtlCache<u32, Vec<Fixture>>,
    event_live_cache: TtlCache<u32, EventLive>,
    picks_cache: TtlCache<(u32, u32), EntryEventPicks>,
}

impl FplClient {
    /// Create a client on the system clock
    pub fn new(config: FetcherConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock (used by tests)
    pub fn with_clock(config: FetcherConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            bootstrap_cache: TtlCache::new(clock.clone()),
            fixtures_cache: TtlCache::new(clock.clone()),
            event_live_cache: TtlCache::new(clock.clone()),
            picks_cache: TtlCache::new(clock.clone()),
            clock,
            config,
        })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Fetch season metadata, cached for hours
    pub async fn bootstrap(&self) -> Option<Bootstrap> {
        if let Some(cached) = self.bootstrap_cache.get(&()) {
            debug!("bootstrap-static cache hit");
            return Some(cached);
        }
        let url = format!("{}/bootstrap-static/", self.config.base_url);
        let bootstrap: Bootstrap = self.get_json(&url).await?;
        self.bootstrap_cache.put((), bootstrap.clone(), self.config.bootstrap_ttl);
        Some(bootstrap)
    }

    /// Fetch the EPL fixtures for a gameweek
    pub async fn fixtures(&self, gw: u32) -> Option<Vec<Fixture>> {
        if let Some(cached) = self.fixtures_cache.get(&gw) {
            debug!("fixtures cache hit for gw={}", gw);
            return Some(cached);
        }
        let url = format!("{}/fixtures/?event={}", self.config.base_url, gw);
        let fixtures: Vec<Fixture> = self.get_json(&url).await?;
        self.fixtures_cache.put(gw, fixtures.clone(), self.config.fixtures_ttl);
        Some(fixtures)
    }

    /// Fetch live per-player point totals for a gameweek
    pub async fn event_live(&self, gw: u32) -> Option<EventLive> {
        if let Some(cached) = self.event_live_cache.get(&gw) {
            debug!("event-live cache hit for gw={}", gw);
            return Some(cached);
        }
        let url = format!("{}/event/{}/live/", self.config.base_url, gw);
        let live: EventLive = self.get_json(&url).await?;
        self.event_live_cache.put(gw, live.clone(), self.config.event_live_ttl);
        Some(live)
    }

    /// Fetch a manager's picks for a gameweek
    pub async fn entry_picks(&self, entry_id: u32, gw: u32) -> Option<EntryEventPicks> {
        if let Some(cached) = self.picks_cache.get(&(entry_id, gw)) {
            return Some(cached);
        }
        let url = format!("{}/entry/{}/event/{}/picks/", self.config.base_url, entry_id, gw);
        let picks: EntryEventPicks = self.get_json(&url).await?;
        self.picks_cache.put((entry_id, gw), picks.clone(), self.config.picks_ttl);
        Some(picks)
    }

    /// Status flags for a gameweek
    ///
    /// `is_started` also turns on inside the configured lead window before
    /// the deadline, for pre-announcement purposes.
    pub fn gameweek_status(&self, bootstrap: &Bootstrap, gw: u32) -> Option<GameweekStatus> {
        let event = bootstrap.event(gw)?;
        let now = self.clock.now();
        let lead = chrono::Duration::from_std(self.config.deadline_lead)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let within_lead =
            event.deadline_time.map(|deadline| now >= deadline - lead).unwrap_or(false);
        Some(GameweekStatus {
            id: gw,
            name: event.name.clone(),
            is_current: event.is_current,
            is_next: event.is_next,
            is_finished: event.finished,
            is_started: event.is_current || event.is_previous || event.finished || within_lead,
        })
    }

    /// Whether a gameweek's deadline has passed (no lead window)
    pub fn has_gameweek_started(&self, bootstrap: &Bootstrap, gw: u32) -> bool {
        let Some(event) = bootstrap.event(gw) else {
            return false;
        };
        if event.is_current || event.is_previous || event.finished {
            return true;
        }
        event.deadline_time.map(|deadline| self.clock.now() >= deadline).unwrap_or(false)
    }

    /// Fetch and aggregate per-manager stats for a scoring pass
    ///
    /// Picks are fetched as a bounded-fan-out concurrent batch and joined
    /// before aggregation; results key strictly by entry id so completion
    /// order is irrelevant. Each failed fetch degrades that manager to
    /// zeros with a warning.
    #[allow(clippy::too_many_arguments)]
    pub async fn manager_stats(
        &self,
        entry_ids: &[u32],
        gw: u32,
        can_fetch_picks: bool,
        element_points: &HashMap<u32, i32>,
        element_to_team: &HashMap<u32, u32>,
        unstarted_teams: &HashSet<u32>,
        warnings: &mut Warnings,
    ) -> HashMap<u32, ManagerStats> {
        let mut stats = HashMap::new();

        if !can_fetch_picks {
            // Gameweek has not started; picks do not exist yet.
            for &entry_id in entry_ids {
                stats.insert(entry_id, ManagerStats::zero(entry_id));
            }
            return stats;
        }

        let fetched: Vec<(u32, Option<EntryEventPicks>)> = stream::iter(
            entry_ids
                .iter()
                .copied()
                .map(|entry_id| async move { (entry_id, self.entry_picks(entry_id, gw).await) }),
        )
        .buffer_unordered(self.config.picks_concurrency.max(1))
        .collect()
        .await;

        let mut missing_element_mapping = false;

        for (entry_id, picks) in fetched {
            let Some(picks) = picks else {
                warnings.push(format!(
                    "Failed to fetch picks for entryId={} (gw={}), using 0.",
                    entry_id, gw
                ));
                stats.insert(entry_id, ManagerStats::zero(entry_id));
                continue;
            };

            let mut gw_points = picks.gw_points();
            if !element_points.is_empty() {
                // Live data is fresher than the provider's entry_history
                // total, which lags during matches.
                let mut live_points = 0;
                for pick in &picks.picks {
                    if pick.multiplier <= 0 {
                        continue;
                    }
                    let points = element_points.get(&pick.element).copied().unwrap_or(0);
                    live_points += points * pick.multiplier;
                }
                gw_points = live_points;
            }

            let mut players_left_to_play = 0;
            if !element_to_team.is_empty() && !unstarted_teams.is_empty() {
                for pick in &picks.picks {
                    if pick.multiplier <= 0 {
                        continue;
                    }
                    match element_to_team.get(&pick.element) {
                        Some(team) if unstarted_teams.contains(team) => {
                            players_left_to_play += 1;
                        }
                        Some(_) => {}
                        None => missing_element_mapping = true,
                    }
                }
            }

            stats.insert(entry_id, ManagerStats { entry_id, gw_points, players_left_to_play });
        }

        if missing_element_mapping {
            warnings.push("Missing element->team mapping for some players; treated as started.");
        }

        stats
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        // Retried exactly once; a second failure degrades to None.
        for attempt in 1..=2 {
            match self.try_get_json(url).await {
                Ok(value) => return Some(value),
                Err(e) => {
                    warn!("FPL request failed (attempt {}/2) for {}: {}", attempt, url, e);
                }
            }
        }
        None
    }

    async fn try_get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await.context("request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("request returned status {}", response.status());
        }
        response.json().await.context("failed to parse response JSON")
    }
}
