//! Wire and domain types for the scoring engine
//!
//! Payload types serialize camelCase to match the consumer-facing JSON
//! format; standings rows keep their snake_case column names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-off modifier a team can apply in a given gameweek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipType {
    DoublePointer,
    WinWin,
    Challenge,
}

impl ChipType {
    /// Stable wire label, used in warning messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ChipType::DoublePointer => "double_pointer",
            ChipType::WinWin => "win_win",
            ChipType::Challenge => "challenge",
        }
    }
}

/// Provenance of a side's effective captain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptainStatus {
    /// No selection and no scheduled default exist yet
    Pending,
    /// A concrete captain was selected or scheduled
    Selected,
    /// The side explicitly declared no captain for this gameweek
    Unannounced,
}

/// Which side of a matchup a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupSide {
    Home,
    Away,
}

impl MatchupSide {
    /// Stable lowercase label, used in storage keys and warnings
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchupSide::Home => "home",
            MatchupSide::Away => "away",
        }
    }
}

/// Per-manager stats consumed from the upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStats {
    pub entry_id: u32,
    pub gw_points: i32,
    pub players_left_to_play: u32,
}

impl ManagerStats {
    /// Safe default when the provider could not supply data for an entry
    pub fn zero(entry_id: u32) -> Self {
        Self { entry_id, gw_points: 0, players_left_to_play: 0 }
    }
}

/// Display metadata for a manager, sourced from the team roster file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerMeta {
    pub manager_name: Option<String>,
    pub fpl_team_name: Option<String>,
}

/// A manager entry inside a scored side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerEntry {
    pub entry_id: u32,
    pub gw_points: i32,
    pub players_left_to_play: u32,
    pub is_captain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpl_team_name: Option<String>,
}

/// One side of a matchup after aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideScore {
    pub name: String,
    pub captain_entry_id: Option<u32>,
    pub captain_status: CaptainStatus,
    pub base_points: i32,
    pub captain_bonus: i32,
    pub total_points: i32,
    pub players_left_to_play: u32,
    pub managers: Vec<ManagerEntry>,
}

/// A fully scored matchup
///
/// League-point fields are optional on the wire because archived payloads
/// written before chips existed omit them; consumers fall back to the 2/1/0
/// base rule computed from raw totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupScore {
    pub id: String,
    pub home: SideScore,
    pub away: SideScore,
    #[serde(default)]
    pub home_base_league_points: Option<u8>,
    #[serde(default)]
    pub away_base_league_points: Option<u8>,
    #[serde(default)]
    pub home_final_league_points: Option<u8>,
    #[serde(default)]
    pub away_final_league_points: Option<u8>,
    #[serde(default)]
    pub home_chip_type: Option<ChipType>,
    #[serde(default)]
    pub away_chip_type: Option<ChipType>,
}

impl MatchupScore {
    /// The side score for the given side
    pub fn side(&self, side: MatchupSide) -> &SideScore {
        match side {
            MatchupSide::Home => &self.home,
            MatchupSide::Away => &self.away,
        }
    }
}

/// Cross-group fixture spawned by a challenge chip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeFixture {
    pub gw: u32,
    pub challenger_team_name: String,
    pub opponent_team_name: String,
    pub challenger_managers: Vec<u32>,
    pub opponent_managers: Vec<u32>,
    pub challenger_tvt_points: i32,
    pub opponent_tvt_points: i32,
    pub challenger_base_league_points: u8,
    pub created_from_chip: ChipType,
}

/// A user-submitted captain selection, keyed by `(gw, matchup_id, side)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptainSelection {
    pub gw: u32,
    pub matchup_id: String,
    pub side: MatchupSide,
    pub captain_entry_id: Option<u32>,
    pub status: CaptainStatus,
}

/// Status flags for a gameweek as reported by the upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameweekStatus {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_current: bool,
    pub is_next: bool,
    pub is_finished: bool,
    pub is_started: bool,
}

/// Per-gameweek scoring payload produced for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScorePayload {
    pub gw: u32,
    pub active_gw: Option<u32>,
    pub generated_at: DateTime<Utc>,
    pub matchups: Vec<MatchupScore>,
    #[serde(default)]
    pub challenge_fixtures: Vec<ChallengeFixture>,
    pub warnings: Vec<String>,
    pub gw_status: Option<GameweekStatus>,
}

impl LiveScorePayload {
    /// True when the archived payload captured an already-finished gameweek
    pub fn is_finished(&self) -> bool {
        self.gw_status.as_ref().map(|status| status.is_finished).unwrap_or(false)
    }
}

/// One row of a group standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team_name: String,
    pub mp: u32,
    pub w: u32,
    pub d: u32,
    pub l: u32,
    pub cp_bp: i32,
    pub points: i32,
    pub overall_scores: i32,
    pub qualifying_for: String,
}

/// Which source supplied a gameweek's matchups during the standings replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Live,
    Archived,
}

/// Archived-payload freshness at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchivedStatus {
    Finished,
    Live,
}

/// Per-gameweek diagnostics emitted alongside standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub gw: u32,
    pub source: ResultSource,
    pub archived_status: Option<ArchivedStatus>,
}

/// Ranked standings payload for both groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsPayload {
    pub gw: u32,
    pub baseline_gw: u32,
    pub group_a: Vec<StandingRow>,
    pub group_b: Vec<StandingRow>,
    pub warnings: Vec<String>,
    pub source_summary: Vec<SourceSummary>,
}
