//! Captain resolution and selection validation
//!
//! Three sources compete for each side's captain. Resolution order, first
//! match wins:
//!
//! 1. a stored user selection for `(gw, matchup_id, side)`, taken verbatim;
//! 2. a per-gameweek schedule override for the matchup;
//! 3. the matchup's scheduled default;
//! 4. otherwise the side is `Pending` with no captain.

use crate::league::CaptainSchedule;
use crate::models::{CaptainSelection, CaptainStatus, MatchupSide};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The effective captain for one side, with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCaptain {
    pub captain_entry_id: Option<u32>,
    pub status: CaptainStatus,
}

impl ResolvedCaptain {
    pub fn pending() -> Self {
        Self { captain_entry_id: None, status: CaptainStatus::Pending }
    }
}

/// Resolved captains for both sides of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMatchupCaptains {
    pub home: ResolvedCaptain,
    pub away: ResolvedCaptain,
}

impl ResolvedMatchupCaptains {
    pub fn side(&self, side: MatchupSide) -> ResolvedCaptain {
        match side {
            MatchupSide::Home => self.home,
            MatchupSide::Away => self.away,
        }
    }
}

/// Stored captain selections for one gameweek, keyed by matchup and side
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    selections: HashMap<(String, MatchupSide), CaptainSelection>,
}

impl SelectionSet {
    pub fn new(rows: Vec<CaptainSelection>) -> Self {
        let selections = rows
            .into_iter()
            .map(|row| ((row.matchup_id.clone(), row.side), row))
            .collect();
        Self { selections }
    }

    pub fn get(&self, matchup_id: &str, side: MatchupSide) -> Option<&CaptainSelection> {
        self.selections.get(&(matchup_id.to_string(), side))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

fn resolve_side(
    selection: Option<&CaptainSelection>,
    scheduled: Option<u32>,
) -> ResolvedCaptain {
    if let Some(selection) = selection {
        // A stored selection always wins, whatever the schedule says.
        return ResolvedCaptain {
            captain_entry_id: selection.captain_entry_id,
            status: selection.status,
        };
    }
    match scheduled {
        Some(entry_id) => {
            ResolvedCaptain { captain_entry_id: Some(entry_id), status: CaptainStatus::Selected }
        }
        None => ResolvedCaptain::pending(),
    }
}

/// Resolve both sides of a matchup for a gameweek
pub fn resolve_matchup_captains(
    schedule: &CaptainSchedule,
    selections: &SelectionSet,
    gw: u32,
    matchup_id: &str,
) -> ResolvedMatchupCaptains {
    let pair = schedule.pair_for(gw, matchup_id);
    ResolvedMatchupCaptains {
        home: resolve_side(
            selections.get(matchup_id, MatchupSide::Home),
            pair.and_then(|p| p.home_captain),
        ),
        away: resolve_side(
            selections.get(matchup_id, MatchupSide::Away),
            pair.and_then(|p| p.away_captain),
        ),
    }
}

/// Rejection reasons for a captain-selection submission
///
/// This is the one hard-failure path in the engine: submissions are direct
/// user actions, not derived computations, so they fail loudly instead of
/// degrading to a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid gameweek.")]
    InvalidGameweek,

    #[error("Invalid request.")]
    MissingMatchupId,

    #[error("Invalid captain status.")]
    InvalidStatus,

    #[error("Captain entryId is required.")]
    MissingCaptainEntryId,
}

/// A captain-selection submission body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub gw: u32,
    pub matchup_id: String,
    pub side: MatchupSide,
    #[serde(default)]
    pub captain_entry_id: Option<u32>,
    pub status: CaptainStatus,
}

impl SelectionRequest {
    /// Validate the submission and convert it to a storable selection row
    ///
    /// `selected` requires a concrete entry id; `unannounced` forces the id
    /// to null regardless of what was supplied; `pending` is never a valid
    /// submission.
    pub fn validate(self) -> Result<CaptainSelection, SelectionError> {
        if self.gw == 0 {
            return Err(SelectionError::InvalidGameweek);
        }
        if self.matchup_id.is_empty() {
            return Err(SelectionError::MissingMatchupId);
        }

        let captain_entry_id = match self.status {
            CaptainStatus::Pending => return Err(SelectionError::InvalidStatus),
            CaptainStatus::Unannounced => None,
            CaptainStatus::Selected => match self.captain_entry_id {
                Some(entry_id) => Some(entry_id),
                None => return Err(SelectionError::MissingCaptainEntryId),
            },
        };

        Ok(CaptainSelection {
            gw: self.gw,
            matchup_id: self.matchup_id,
            side: self.side,
            captain_entry_id,
            status: self.status,
        })
    }
}
