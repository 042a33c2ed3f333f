//! FPL API wire types
//!
//! Only the fields this system consumes are modeled; everything else in the
//! provider's payloads is ignored. Missing fields default so a partially
//! malformed payload degrades instead of failing deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// `bootstrap-static`: season-wide gameweek and player metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// One gameweek in the bootstrap events list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub is_previous: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
}

/// One player in the bootstrap elements list
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Element {
    pub id: u32,
    pub team: u32,
}

impl Bootstrap {
    /// The active gameweek: explicitly current, else explicitly next, else
    /// the most recent finished one
    pub fn current_gameweek(&self) -> Option<u32> {
        if let Some(current) = self.events.iter().find(|event| event.is_current) {
            return Some(current.id);
        }
        if let Some(next) = self.events.iter().find(|event| event.is_next) {
            return Some(next.id);
        }
        self.events.iter().filter(|event| event.finished).map(|event| event.id).max()
    }

    pub fn event(&self, gw: u32) -> Option<&Event> {
        self.events.iter().find(|event| event.id == gw)
    }

    /// Player element id to club id, for players-left-to-play derivation
    pub fn element_to_team(&self) -> HashMap<u32, u32> {
        self.elements.iter().map(|element| (element.id, element.team)).collect()
    }
}

/// One EPL fixture in a gameweek
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub kickoff_time: Option<DateTime<Utc>>,
    pub team_h: u32,
    pub team_a: u32,
}

/// Club ids with at least one unstarted fixture
///
/// A fixture counts as started when its explicit flag says so, or when its
/// kickoff time has passed; a fixture with neither flag nor kickoff is not
/// yet scheduled, so it has not started.
pub fn unstarted_teams(fixtures: &[Fixture], now: DateTime<Utc>) -> HashSet<u32> {
    let mut teams = HashSet::new();
    for fixture in fixtures {
        let started = match (fixture.started, fixture.kickoff_time) {
            (Some(flag), _) => flag,
            (None, Some(kickoff)) => kickoff <= now,
            (None, None) => false,
        };
        if !started {
            teams.insert(fixture.team_h);
            teams.insert(fixture.team_a);
        }
    }
    teams
}

/// `event/{gw}/live`: live per-player point totals
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLive {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveElement {
    pub id: u32,
    #[serde(default)]
    pub stats: LiveElementStats,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LiveElementStats {
    #[serde(default)]
    pub total_points: i32,
}

impl EventLive {
    pub fn element_points(&self) -> HashMap<u32, i32> {
        self.elements.iter().map(|element| (element.id, element.stats.total_points)).collect()
    }
}

/// `entry/{id}/event/{gw}/picks`: a manager's roster for a gameweek
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryEventPicks {
    #[serde(default)]
    pub entry_history: Option<EntryHistory>,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EntryHistory {
    #[serde(default)]
    pub points: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pick {
    pub element: u32,
    #[serde(default)]
    pub multiplier: i32,
}

impl EntryEventPicks {
    /// The provider's pre-computed gameweek total, zero when absent
    pub fn gw_points(&self) -> i32 {
        self.entry_history.and_then(|history| history.points).unwrap_or(0)
    }
}
