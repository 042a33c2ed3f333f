//! League configuration files
//!
//! The league is described by four JSON files (matchup brackets, scheduled
//! captains, team roster, chip assignments) plus two baseline standings
//! tables. All of it is read-only at run time.

use crate::error::{Result, ScoringError};
use crate::models::{ChipType, ManagerMeta};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One side of a configured matchup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupSideConfig {
    pub name: String,
    /// Entry ids of the side's managers; an empty list falls back to the
    /// team roster at scoring time
    #[serde(default)]
    pub managers: Vec<u32>,
}

/// A configured matchup between two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupConfig {
    pub id: String,
    pub home: MatchupSideConfig,
    pub away: MatchupSideConfig,
}

/// The matchup bracket file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupsFile {
    #[serde(default)]
    pub league_id: Option<u64>,
    /// Brackets keyed by gameweek number (as string keys on the wire)
    #[serde(default)]
    pub matchups_by_gameweek: BTreeMap<String, Vec<MatchupConfig>>,
    /// Flat fallback bracket used when no per-gameweek entry exists
    #[serde(default)]
    pub matchups: Option<Vec<MatchupConfig>>,
}

impl MatchupsFile {
    /// The bracket for a gameweek: per-gameweek entry first, flat fallback second
    pub fn matchups_for(&self, gw: u32) -> Option<&[MatchupConfig]> {
        if let Some(list) = self.matchups_by_gameweek.get(&gw.to_string()) {
            return Some(list.as_slice());
        }
        self.matchups.as_deref()
    }

    /// Whether a per-gameweek bracket exists for this gameweek
    pub fn has_gameweek(&self, gw: u32) -> bool {
        self.matchups_by_gameweek.contains_key(&gw.to_string())
    }

    /// Highest gameweek with a configured bracket
    pub fn max_gameweek(&self) -> Option<u32> {
        self.matchups_by_gameweek.keys().filter_map(|key| key.parse::<u32>().ok()).max()
    }
}

/// Scheduled captain pair for a matchup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainPair {
    pub home_captain: Option<u32>,
    pub away_captain: Option<u32>,
}

/// The scheduled-captains file: per-matchup defaults with optional
/// per-gameweek overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainSchedule {
    #[serde(default)]
    pub default: HashMap<String, CaptainPair>,
    #[serde(default)]
    pub by_gameweek: HashMap<String, HashMap<String, CaptainPair>>,
}

impl CaptainSchedule {
    /// Scheduled captains for a matchup: gameweek override first, default second
    pub fn pair_for(&self, gw: u32, matchup_id: &str) -> Option<&CaptainPair> {
        self.by_gameweek
            .get(&gw.to_string())
            .and_then(|overrides| overrides.get(matchup_id))
            .or_else(|| self.default.get(matchup_id))
    }
}

/// A manager in the team roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub manager_key: String,
    pub manager_name: String,
    pub entry_id: Option<u32>,
    #[serde(default)]
    pub fpl_team_name: Option<String>,
}

/// A team in the league roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// The team roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsFile {
    pub league_id: u64,
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
}

impl TeamsFile {
    /// Team name to the entry ids of its registered managers
    pub fn team_managers(&self) -> HashMap<String, Vec<u32>> {
        self.teams
            .iter()
            .map(|team| {
                let entry_ids =
                    team.members.iter().filter_map(|member| member.entry_id).collect();
                (team.team_name.clone(), entry_ids)
            })
            .collect()
    }

    /// Entry id to display metadata, for payload decoration
    pub fn manager_meta(&self) -> HashMap<u32, ManagerMeta> {
        let mut meta = HashMap::new();
        for team in &self.teams {
            for member in &team.members {
                if let Some(entry_id) = member.entry_id {
                    meta.insert(
                        entry_id,
                        ManagerMeta {
                            manager_name: Some(member.manager_name.clone()),
                            fpl_team_name: member.fpl_team_name.clone(),
                        },
                    );
                }
            }
        }
        meta
    }
}

/// One chip assignment for a team in a gameweek
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipAssignment {
    pub chip_type: Option<ChipType>,
    #[serde(default)]
    pub challenge_opponent_team_name: Option<String>,
}

/// Chip assignments for a team: a single object or a list on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChipEntry {
    Single(ChipAssignment),
    Multiple(Vec<ChipAssignment>),
}

impl ChipEntry {
    pub fn assignments(&self) -> &[ChipAssignment] {
        match self {
            ChipEntry::Single(assignment) => std::slice::from_ref(assignment),
            ChipEntry::Multiple(assignments) => assignments.as_slice(),
        }
    }

    /// Whether any assignment carries the given chip type
    pub fn has(&self, chip: ChipType) -> bool {
        self.assignments().iter().any(|assignment| assignment.chip_type == Some(chip))
    }
}

/// The chips file, keyed by gameweek then team name
///
/// Team maps are BTreeMaps so chip evaluation order (and therefore warning
/// and fixture order) is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipsFile {
    #[serde(default)]
    pub by_gameweek: HashMap<String, BTreeMap<String, ChipEntry>>,
}

impl ChipsFile {
    pub fn chips_for(&self, gw: u32) -> Option<&BTreeMap<String, ChipEntry>> {
        self.by_gameweek.get(&gw.to_string())
    }
}

/// Load any league data file from JSON
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScoringError::config(format!("unable to read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matchups() -> MatchupsFile {
        serde_json::from_value(serde_json::json!({
            "leagueId": 12345,
            "matchupsByGameweek": {
                "28": [
                    {
                        "id": "m1",
                        "home": { "name": "Alpha", "managers": [101, 102] },
                        "away": { "name": "Beta", "managers": [201, 202] }
                    }
                ],
                "30": []
            },
            "matchups": [
                {
                    "id": "flat-1",
                    "home": { "name": "Alpha", "managers": [101, 102] },
                    "away": { "name": "Beta", "managers": [201, 202] }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn matchups_prefer_per_gameweek_entry() {
        let file = sample_matchups();
        let gw28 = file.matchups_for(28).unwrap();
        assert_eq!(gw28.len(), 1);
        assert_eq!(gw28[0].id, "m1");
        // No entry for gw 29 -> flat fallback.
        let gw29 = file.matchups_for(29).unwrap();
        assert_eq!(gw29[0].id, "flat-1");
        assert!(file.has_gameweek(28));
        assert!(!file.has_gameweek(29));
        assert_eq!(file.max_gameweek(), Some(30));
    }

    #[test]
    fn captain_schedule_override_beats_default() {
        let schedule: CaptainSchedule = serde_json::from_value(serde_json::json!({
            "default": { "m1": { "homeCaptain": 101, "awayCaptain": 201 } },
            "byGameweek": {
                "30": { "m1": { "homeCaptain": 102, "awayCaptain": null } }
            }
        }))
        .unwrap();

        let default = schedule.pair_for(29, "m1").unwrap();
        assert_eq!(default.home_captain, Some(101));

        let overridden = schedule.pair_for(30, "m1").unwrap();
        assert_eq!(overridden.home_captain, Some(102));
        assert_eq!(overridden.away_captain, None);

        assert!(schedule.pair_for(29, "m9").is_none());
    }

    #[test]
    fn teams_file_builds_lookup_maps() {
        let teams: TeamsFile = serde_json::from_value(serde_json::json!({
            "leagueId": 12345,
            "teams": [
                {
                    "teamName": "Alpha",
                    "members": [
                        { "managerKey": "sam", "managerName": "Sam", "entryId": 101, "fplTeamName": "Sam XI" },
                        { "managerKey": "kit", "managerName": "Kit", "entryId": null }
                    ]
                }
            ]
        }))
        .unwrap();

        let managers = teams.team_managers();
        assert_eq!(managers["Alpha"], vec![101]);

        let meta = teams.manager_meta();
        assert_eq!(meta[&101].manager_name.as_deref(), Some("Sam"));
        assert_eq!(meta[&101].fpl_team_name.as_deref(), Some("Sam XI"));
    }

    #[test]
    fn chip_entry_accepts_single_and_list() {
        let chips: ChipsFile = serde_json::from_value(serde_json::json!({
            "byGameweek": {
                "30": {
                    "Alpha": { "chipType": "double_pointer" },
                    "Beta": [
                        { "chipType": "win_win" },
                        { "chipType": "challenge", "challengeOpponentTeamName": "Alpha" }
                    ]
                }
            }
        }))
        .unwrap();

        let for_gw = chips.chips_for(30).unwrap();
        assert!(for_gw["Alpha"].has(ChipType::DoublePointer));
        assert!(!for_gw["Alpha"].has(ChipType::WinWin));
        assert!(for_gw["Beta"].has(ChipType::WinWin));
        assert!(for_gw["Beta"].has(ChipType::Challenge));
        assert!(chips.chips_for(31).is_none());
    }
}
