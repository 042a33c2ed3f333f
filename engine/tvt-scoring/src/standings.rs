//! Standings aggregation
//!
//! Season standings are never persisted: every computation starts from the
//! baseline snapshot and replays each subsequent finished gameweek's matchup
//! deltas, then sorts and ranks both groups with a fixed tie-break chain.

use crate::matchup::league_points;
use crate::models::{MatchupScore, StandingRow};
use crate::warnings::Warnings;
use std::collections::HashMap;

/// Qualification tier labels by final rank
pub const TVT_PLAYOFFS: &str = "TVT Playoffs";
pub const CHALLENGERS_PLAYOFFS: &str = "Challenger's Playoffs";
pub const ELIMINATION_ZONE: &str = "Elimination Zone";

/// Known historical spelling variants mapped to the canonical baseline name
const TEAM_NAME_ALIASES: &[(&str, &str)] = &[
    ("Despicable Memelennials", "Despicable Memelenials"),
    ("North Eastern Hillbillies", "North Eastern Hillibillies"),
    ("xG Xorcists", "XX Orcsits"),
    ("Maresca's Villagers", "Maresca\u{2019}s Villagers"),
];

/// Resolve a team name to its canonical baseline spelling
pub fn canonical_team_name(name: &str) -> &str {
    TEAM_NAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// The two fixed league groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    A,
    B,
}

/// Mutable season standings built from a baseline snapshot
#[derive(Debug, Clone)]
pub struct StandingsAccumulator {
    group_a: HashMap<String, StandingRow>,
    group_b: HashMap<String, StandingRow>,
    index: HashMap<String, Group>,
}

impl StandingsAccumulator {
    pub fn new(baseline_a: &[StandingRow], baseline_b: &[StandingRow]) -> Self {
        let group_a: HashMap<String, StandingRow> =
            baseline_a.iter().map(|row| (row.team_name.clone(), row.clone())).collect();
        let group_b: HashMap<String, StandingRow> =
            baseline_b.iter().map(|row| (row.team_name.clone(), row.clone())).collect();

        let mut index = HashMap::new();
        for name in group_a.keys() {
            index.insert(name.clone(), Group::A);
        }
        for name in group_b.keys() {
            index.insert(name.clone(), Group::B);
        }

        Self { group_a, group_b, index }
    }

    /// Start a gameweek: every team plays exactly one matchup per gameweek
    pub fn begin_gameweek(&mut self) {
        for row in self.group_a.values_mut() {
            row.mp += 1;
        }
        for row in self.group_b.values_mut() {
            row.mp += 1;
        }
    }

    /// Fold one matchup's delta into the standings
    ///
    /// If either team is missing from the baseline index the whole delta is
    /// skipped, never half-applied.
    pub fn apply_matchup(&mut self, matchup: &MatchupScore, warnings: &mut Warnings) {
        let home_name = canonical_team_name(&matchup.home.name).to_string();
        let away_name = canonical_team_name(&matchup.away.name).to_string();

        let home_group = self.index.get(&home_name).copied();
        let away_group = self.index.get(&away_name).copied();
        if home_group.is_none() || away_group.is_none() {
            if home_group.is_none() {
                warnings.push(format!("Team not found in baseline: {}", matchup.home.name));
            }
            if away_group.is_none() {
                warnings.push(format!("Team not found in baseline: {}", matchup.away.name));
            }
            return;
        }

        let home_points = matchup.home.total_points;
        let away_points = matchup.away.total_points;
        let (home_league, away_league) = league_points(matchup);

        if let Some(row) = self.row_mut(home_group.unwrap_or(Group::A), &home_name) {
            match home_points.cmp(&away_points) {
                std::cmp::Ordering::Greater => row.w += 1,
                std::cmp::Ordering::Less => row.l += 1,
                std::cmp::Ordering::Equal => row.d += 1,
            }
            row.points += i32::from(home_league);
            row.overall_scores += home_points;
        }
        if let Some(row) = self.row_mut(away_group.unwrap_or(Group::B), &away_name) {
            match away_points.cmp(&home_points) {
                std::cmp::Ordering::Greater => row.w += 1,
                std::cmp::Ordering::Less => row.l += 1,
                std::cmp::Ordering::Equal => row.d += 1,
            }
            row.points += i32::from(away_league);
            row.overall_scores += away_points;
        }
    }

    /// Sort, rank and tier both groups
    pub fn finish(self) -> (Vec<StandingRow>, Vec<StandingRow>) {
        (
            sort_and_rank(self.group_a.into_values().collect()),
            sort_and_rank(self.group_b.into_values().collect()),
        )
    }

    fn row_mut(&mut self, group: Group, name: &str) -> Option<&mut StandingRow> {
        match group {
            Group::A => self.group_a.get_mut(name),
            Group::B => self.group_b.get_mut(name),
        }
    }
}

/// Sort rows by the fixed tie-break chain, assign 1-based ranks and
/// qualification tiers
///
/// Chain: points desc, wins desc, cp_bp desc, overall_scores desc, team name
/// ascending as the final deterministic tie-break.
pub fn sort_and_rank(mut rows: Vec<StandingRow>) -> Vec<StandingRow> {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.w.cmp(&a.w))
            .then_with(|| b.cp_bp.cmp(&a.cp_bp))
            .then_with(|| b.overall_scores.cmp(&a.overall_scores))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });

    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index as u32 + 1;
        row.qualifying_for = qualification_tier(row.rank).to_string();
    }

    rows
}

/// Qualification tier for a final rank
pub fn qualification_tier(rank: u32) -> &'static str {
    if rank <= 8 {
        TVT_PLAYOFFS
    } else if rank <= 14 {
        CHALLENGERS_PLAYOFFS
    } else {
        ELIMINATION_ZONE
    }
}

/// Baseline rows in their stored rank order, for requests at or before the
/// baseline gameweek
pub fn baseline_sorted(rows: &[StandingRow]) -> Vec<StandingRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|row| row.rank);
    sorted
}
