//! Side aggregation
//!
//! Sums a side's managers into base points and players-left-to-play, then
//! applies the captain bonus. When no valid captain is known the side falls
//! back to boosting its lowest scorer: the fallback only fires when a
//! captain was never announced, so the side is insured rather than rewarded.

use crate::captain::ResolvedCaptain;
use crate::models::{ManagerEntry, ManagerMeta, ManagerStats, MatchupSide, SideScore};
use crate::warnings::Warnings;
use std::collections::HashMap;

/// Number of managers every side is expected to field
pub const EXPECTED_MANAGERS_PER_SIDE: usize = 2;

/// Aggregate one side of a matchup
///
/// Managers missing from `stats` score zero. A resolved captain who is not a
/// member of this side is discarded with a warning and the fallback applies.
/// An empty manager list produces an all-zero side without error.
pub fn score_side(
    name: &str,
    managers: &[u32],
    captain: ResolvedCaptain,
    stats: &HashMap<u32, ManagerStats>,
    meta: &HashMap<u32, ManagerMeta>,
    matchup_id: &str,
    side: MatchupSide,
    warnings: &mut Warnings,
) -> SideScore {
    let mut entries: Vec<ManagerEntry> = managers
        .iter()
        .map(|&entry_id| {
            let manager_stats =
                stats.get(&entry_id).copied().unwrap_or_else(|| ManagerStats::zero(entry_id));
            let manager_meta = meta.get(&entry_id).cloned().unwrap_or_default();
            ManagerEntry {
                entry_id,
                gw_points: manager_stats.gw_points,
                players_left_to_play: manager_stats.players_left_to_play,
                is_captain: false,
                manager_name: manager_meta.manager_name,
                fpl_team_name: manager_meta.fpl_team_name,
            }
        })
        .collect();

    let base_points: i32 = entries.iter().map(|entry| entry.gw_points).sum();
    let players_left_to_play: u32 = entries.iter().map(|entry| entry.players_left_to_play).sum();

    let mut captain_entry_id = captain.captain_entry_id;
    if let Some(entry_id) = captain_entry_id {
        if !managers.contains(&entry_id) {
            warnings.push(format!(
                "Captain entryId={} not in managers for matchup={} ({}), bonus set to 0.",
                entry_id,
                matchup_id,
                side.as_str()
            ));
            captain_entry_id = None;
        }
    }

    if captain_entry_id.is_none() {
        captain_entry_id = fallback_captain(&entries);
    }

    let mut captain_bonus = 0;
    for entry in &mut entries {
        entry.is_captain = Some(entry.entry_id) == captain_entry_id;
        if entry.is_captain {
            captain_bonus = entry.gw_points;
        }
    }

    SideScore {
        name: name.to_string(),
        captain_entry_id,
        captain_status: captain.status,
        base_points,
        captain_bonus,
        total_points: base_points + captain_bonus,
        players_left_to_play,
        managers: entries,
    }
}

/// The automatic fallback captain: lowest gameweek score, first in list
/// order on ties. `None` for an empty side.
pub fn fallback_captain(entries: &[ManagerEntry]) -> Option<u32> {
    let mut best: Option<&ManagerEntry> = None;
    for entry in entries {
        match best {
            Some(current) if entry.gw_points < current.gw_points => best = Some(entry),
            None => best = Some(entry),
            _ => {}
        }
    }
    best.map(|entry| entry.entry_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captain::ResolvedCaptain;
    use crate::models::CaptainStatus;

    fn stats(pairs: &[(u32, i32, u32)]) -> HashMap<u32, ManagerStats> {
        pairs
            .iter()
            .map(|&(entry_id, gw_points, left)| {
                (entry_id, ManagerStats { entry_id, gw_points, players_left_to_play: left })
            })
            .collect()
    }

    fn selected(entry_id: u32) -> ResolvedCaptain {
        ResolvedCaptain { captain_entry_id: Some(entry_id), status: CaptainStatus::Selected }
    }

    #[test]
    fn sums_points_and_applies_captain_bonus() {
        let stats = stats(&[(101, 8, 1), (102, 12, 2)]);
        let mut warnings = Warnings::new();
        let score = score_side(
            "Alpha",
            &[101, 102],
            selected(102),
            &stats,
            &HashMap::new(),
            "m1",
            MatchupSide::Home,
            &mut warnings,
        );
        assert_eq!(score.base_points, 20);
        assert_eq!(score.captain_bonus, 12);
        assert_eq!(score.total_points, 32);
        assert_eq!(score.players_left_to_play, 3);
        assert_eq!(score.captain_entry_id, Some(102));
        assert!(score.managers.iter().find(|m| m.entry_id == 102).unwrap().is_captain);
        assert!(warnings.is_empty());
    }

    #[test]
    fn fallback_picks_lowest_scorer() {
        let stats = stats(&[(101, 10, 0), (102, 4, 0)]);
        let mut warnings = Warnings::new();
        let score = score_side(
            "Alpha",
            &[101, 102],
            ResolvedCaptain::pending(),
            &stats,
            &HashMap::new(),
            "m1",
            MatchupSide::Home,
            &mut warnings,
        );
        assert_eq!(score.captain_entry_id, Some(102));
        assert_eq!(score.captain_bonus, 4);
        assert_eq!(score.base_points, 14);
        assert_eq!(score.total_points, 18);
        assert!(warnings.is_empty());
    }

    #[test]
    fn fallback_tie_break_is_first_in_list_order() {
        let stats = stats(&[(201, 5, 0), (202, 5, 0)]);
        let mut warnings = Warnings::new();
        let score = score_side(
            "Beta",
            &[201, 202],
            ResolvedCaptain::pending(),
            &stats,
            &HashMap::new(),
            "m1",
            MatchupSide::Away,
            &mut warnings,
        );
        assert_eq!(score.captain_entry_id, Some(201));
        assert_eq!(score.total_points, 15);
    }

    #[test]
    fn non_member_captain_is_discarded_with_warning() {
        let stats = stats(&[(101, 10, 0), (102, 4, 0)]);
        let mut warnings = Warnings::new();
        let score = score_side(
            "Alpha",
            &[101, 102],
            selected(999),
            &stats,
            &HashMap::new(),
            "m1",
            MatchupSide::Home,
            &mut warnings,
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("entryId=999"));
        // Discarded captain falls through to the lowest-scorer fallback.
        assert_eq!(score.captain_entry_id, Some(102));
        assert_eq!(score.captain_bonus, 4);
    }

    #[test]
    fn empty_side_is_all_zeros() {
        let mut warnings = Warnings::new();
        let score = score_side(
            "Ghosts",
            &[],
            ResolvedCaptain::pending(),
            &HashMap::new(),
            &HashMap::new(),
            "m1",
            MatchupSide::Home,
            &mut warnings,
        );
        assert_eq!(score.base_points, 0);
        assert_eq!(score.captain_bonus, 0);
        assert_eq!(score.total_points, 0);
        assert_eq!(score.captain_entry_id, None);
        assert!(score.managers.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let stats = stats(&[(101, 7, 0)]);
        let mut warnings = Warnings::new();
        let score = score_side(
            "Alpha",
            &[101, 102],
            ResolvedCaptain::pending(),
            &stats,
            &HashMap::new(),
            "m1",
            MatchupSide::Home,
            &mut warnings,
        );
        // 102 has no stats, scores 0 and becomes the fallback captain.
        assert_eq!(score.base_points, 7);
        assert_eq!(score.captain_entry_id, Some(102));
        assert_eq!(score.total_points, 7);
    }
}
