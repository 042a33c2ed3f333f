//! Result store trait

use crate::error::Result;
use std::collections::BTreeMap;
use tvt_scoring::{CaptainSelection, LiveScorePayload, MatchupSide};

/// Abstract trait for result storage backends
///
/// Two record families live behind this trait: archived per-gameweek score
/// payloads (overwritten freely while a gameweek is live) and captain
/// selections (insert-only; a second insert for the same key is a conflict).
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    /// Load the archived payload for one gameweek, if any
    async fn load_result(&self, gw: u32) -> Result<Option<LiveScorePayload>>;

    /// Persist the payload for one gameweek, replacing any prior archive
    async fn save_result(&self, gw: u32, payload: &LiveScorePayload) -> Result<()>;

    /// Load every archived payload, keyed and ordered by gameweek
    async fn load_results(&self) -> Result<BTreeMap<u32, LiveScorePayload>>;

    /// Load all captain selections recorded for one gameweek
    async fn load_selections(&self, gw: u32) -> Result<Vec<CaptainSelection>>;

    /// Record a captain selection
    ///
    /// Fails with `StoreError::AlreadyExists` when a selection for the same
    /// `(gw, matchup_id, side)` key was recorded before; selections are
    /// never updated in place.
    async fn insert_selection(&self, selection: &CaptainSelection) -> Result<()>;
}

/// Canonical uniqueness key for a captain selection
pub fn selection_key(gw: u32, matchup_id: &str, side: MatchupSide) -> String {
    format!("gw-{}:{}:{}", gw, matchup_id, side.as_str())
}
