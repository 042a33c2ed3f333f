//! Chip modifiers and challenge fixtures
//!
//! Chips overlay the base league-point outcome per team, home and away
//! symmetric:
//!
//! - `win_win` forces final league points to 2 whatever the base result;
//! - `double_pointer` doubles the base (draw 1 -> 2, win 2 -> 4) unless the
//!   team also holds `win_win`, which takes precedence with a warning;
//! - `challenge` leaves the bracket matchup untouched and spawns a separate
//!   cross-group fixture scored with the same side-aggregation rules.

use crate::captain::{resolve_matchup_captains, ResolvedCaptain, SelectionSet};
use crate::league::{CaptainSchedule, ChipEntry, MatchupConfig};
use crate::matchup::base_league_points;
use crate::models::{
    ChallengeFixture, ChipType, ManagerMeta, ManagerStats, MatchupScore, MatchupSide,
};
use crate::side::score_side;
use crate::warnings::Warnings;
use std::collections::{BTreeMap, HashMap};

/// Apply chip modifiers to a gameweek's scored matchups
///
/// Challenge chips only mark the side; win_win/double_pointer rewrite the
/// final league points. A win_win/double_pointer team that appears in no
/// bracket matchup gets a warning and no effect.
pub fn apply_chips(
    matchups: &mut [MatchupScore],
    chips: &BTreeMap<String, ChipEntry>,
    gw: u32,
    warnings: &mut Warnings,
) {
    for matchup in matchups.iter_mut() {
        if let Some(entry) = chips.get(&matchup.home.name) {
            let base = matchup
                .home_base_league_points
                .unwrap_or_else(|| {
                    base_league_points(matchup.home.total_points, matchup.away.total_points).0
                });
            let outcome = side_chip_outcome(&matchup.home.name, entry, base, gw, warnings);
            if outcome.chip_type.is_some() {
                matchup.home_chip_type = outcome.chip_type;
            }
            if let Some(final_points) = outcome.final_league_points {
                matchup.home_final_league_points = Some(final_points);
            }
        }
        if let Some(entry) = chips.get(&matchup.away.name) {
            let base = matchup
                .away_base_league_points
                .unwrap_or_else(|| {
                    base_league_points(matchup.home.total_points, matchup.away.total_points).1
                });
            let outcome = side_chip_outcome(&matchup.away.name, entry, base, gw, warnings);
            if outcome.chip_type.is_some() {
                matchup.away_chip_type = outcome.chip_type;
            }
            if let Some(final_points) = outcome.final_league_points {
                matchup.away_final_league_points = Some(final_points);
            }
        }
    }

    for (team_name, entry) in chips {
        let competitive_chip = entry
            .assignments()
            .iter()
            .filter_map(|assignment| assignment.chip_type)
            .find(|chip| matches!(chip, ChipType::WinWin | ChipType::DoublePointer));
        if let Some(chip) = competitive_chip {
            let in_bracket = matchups
                .iter()
                .any(|matchup| matchup.home.name == *team_name || matchup.away.name == *team_name);
            if !in_bracket {
                warnings.push(format!(
                    "Chip team not found: {} (gw={}, chip={}).",
                    team_name,
                    gw,
                    chip.as_str()
                ));
            }
        }
    }
}

struct ChipOutcome {
    chip_type: Option<ChipType>,
    final_league_points: Option<u8>,
}

fn side_chip_outcome(
    team_name: &str,
    entry: &ChipEntry,
    base: u8,
    gw: u32,
    warnings: &mut Warnings,
) -> ChipOutcome {
    let has_win_win = entry.has(ChipType::WinWin);
    let has_double = entry.has(ChipType::DoublePointer);

    let mut outcome = ChipOutcome {
        chip_type: entry.has(ChipType::Challenge).then_some(ChipType::Challenge),
        final_league_points: None,
    };

    if has_win_win && has_double {
        warnings.push(format!(
            "Team {} has both win_win and double_pointer (gw={}); win_win applied.",
            team_name, gw
        ));
    }

    if has_win_win {
        outcome.chip_type = Some(ChipType::WinWin);
        outcome.final_league_points = Some(2);
    } else if has_double {
        outcome.chip_type = Some(ChipType::DoublePointer);
        outcome.final_league_points = Some(base * 2);
    }

    outcome
}

struct TeamLookup<'a> {
    matchup_id: Option<&'a str>,
    side: Option<MatchupSide>,
    managers: Vec<u32>,
}

fn find_team<'a>(
    team_name: &str,
    matchups: &'a [MatchupConfig],
    team_managers: &HashMap<String, Vec<u32>>,
) -> Option<TeamLookup<'a>> {
    for matchup in matchups {
        if matchup.home.name == team_name {
            return Some(TeamLookup {
                matchup_id: Some(&matchup.id),
                side: Some(MatchupSide::Home),
                managers: matchup.home.managers.clone(),
            });
        }
        if matchup.away.name == team_name {
            return Some(TeamLookup {
                matchup_id: Some(&matchup.id),
                side: Some(MatchupSide::Away),
                managers: matchup.away.managers.clone(),
            });
        }
    }
    let roster = team_managers.get(team_name)?;
    if roster.is_empty() {
        return None;
    }
    Some(TeamLookup { matchup_id: None, side: None, managers: roster.clone() })
}

fn challenge_captain(
    lookup: &TeamLookup<'_>,
    schedule: &CaptainSchedule,
    selections: &SelectionSet,
    gw: u32,
) -> ResolvedCaptain {
    match (lookup.matchup_id, lookup.side) {
        (Some(matchup_id), Some(side)) => {
            resolve_matchup_captains(schedule, selections, gw, matchup_id).side(side)
        }
        // Teams with no bracket matchup have no captain source; the
        // aggregator's automatic fallback applies.
        _ => ResolvedCaptain::pending(),
    }
}

/// Build the gameweek's challenge fixtures from its chip assignments
///
/// A challenge with a missing or unresolvable opponent produces a warning
/// and no fixture. Challenge results never feed the main standings.
#[allow(clippy::too_many_arguments)]
pub fn build_challenge_fixtures(
    gw: u32,
    matchups: &[MatchupConfig],
    team_managers: &HashMap<String, Vec<u32>>,
    chips: &BTreeMap<String, ChipEntry>,
    schedule: &CaptainSchedule,
    selections: &SelectionSet,
    stats: &HashMap<u32, ManagerStats>,
    meta: &HashMap<u32, ManagerMeta>,
    warnings: &mut Warnings,
) -> Vec<ChallengeFixture> {
    let mut fixtures = Vec::new();

    for (team_name, entry) in chips {
        for assignment in entry.assignments() {
            if assignment.chip_type != Some(ChipType::Challenge) {
                continue;
            }
            let Some(opponent_name) = assignment.challenge_opponent_team_name.as_deref() else {
                warnings.push(format!(
                    "Challenge chip missing opponent for team={} (gw={}).",
                    team_name, gw
                ));
                continue;
            };

            let Some(challenger) = find_team(team_name, matchups, team_managers) else {
                warnings
                    .push(format!("Challenge chip team not found: {} (gw={}).", team_name, gw));
                continue;
            };
            let Some(opponent) = find_team(opponent_name, matchups, team_managers) else {
                warnings.push(format!(
                    "Challenge chip opponent not found: {} (gw={}).",
                    opponent_name, gw
                ));
                continue;
            };

            let challenger_captain = challenge_captain(&challenger, schedule, selections, gw);
            let opponent_captain = challenge_captain(&opponent, schedule, selections, gw);

            let challenger_score = score_side(
                team_name,
                &challenger.managers,
                challenger_captain,
                stats,
                meta,
                &format!("challenge-{}-{}", gw, team_name),
                MatchupSide::Home,
                warnings,
            );
            let opponent_score = score_side(
                opponent_name,
                &opponent.managers,
                opponent_captain,
                stats,
                meta,
                &format!("challenge-{}-{}", gw, opponent_name),
                MatchupSide::Away,
                warnings,
            );

            let (challenger_base, _) =
                base_league_points(challenger_score.total_points, opponent_score.total_points);

            fixtures.push(ChallengeFixture {
                gw,
                challenger_team_name: team_name.clone(),
                opponent_team_name: opponent_name.to_string(),
                challenger_managers: challenger.managers,
                opponent_managers: opponent.managers,
                challenger_tvt_points: challenger_score.total_points,
                opponent_tvt_points: opponent_score.total_points,
                challenger_base_league_points: challenger_base,
                created_from_chip: ChipType::Challenge,
            });
        }
    }

    fixtures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::score_matchup;
    use crate::models::{CaptainStatus, SideScore};

    fn side(name: &str, total: i32) -> SideScore {
        SideScore {
            name: name.to_string(),
            captain_entry_id: Some(1),
            captain_status: CaptainStatus::Selected,
            base_points: total,
            captain_bonus: 0,
            total_points: total,
            players_left_to_play: 0,
            managers: vec![],
        }
    }

    fn chips(value: serde_json::Value) -> BTreeMap<String, ChipEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn win_win_forces_two_points() {
        let mut matchups = vec![score_matchup("m1", side("Alpha", 10), side("Beta", 30))];
        let chips = chips(serde_json::json!({ "Alpha": { "chipType": "win_win" } }));
        let mut warnings = Warnings::new();

        apply_chips(&mut matchups, &chips, 30, &mut warnings);

        assert_eq!(matchups[0].home_chip_type, Some(ChipType::WinWin));
        assert_eq!(matchups[0].home_base_league_points, Some(0));
        assert_eq!(matchups[0].home_final_league_points, Some(2));
        // Losing side untouched.
        assert_eq!(matchups[0].away_final_league_points, Some(2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn double_pointer_doubles_draw_and_win() {
        let mut matchups = vec![
            score_matchup("m1", side("Alpha", 20), side("Beta", 20)),
            score_matchup("m2", side("Gamma", 30), side("Delta", 10)),
        ];
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "double_pointer" },
            "Gamma": { "chipType": "double_pointer" }
        }));
        let mut warnings = Warnings::new();

        apply_chips(&mut matchups, &chips, 30, &mut warnings);

        assert_eq!(matchups[0].home_final_league_points, Some(2));
        assert_eq!(matchups[0].away_final_league_points, Some(1));
        assert_eq!(matchups[1].home_final_league_points, Some(4));
        assert!(warnings.is_empty());
    }

    #[test]
    fn win_win_beats_double_pointer_with_one_warning() {
        let mut matchups = vec![score_matchup("m1", side("Alpha", 10), side("Beta", 30))];
        let chips = chips(serde_json::json!({
            "Alpha": [
                { "chipType": "win_win" },
                { "chipType": "double_pointer" }
            ]
        }));
        let mut warnings = Warnings::new();

        apply_chips(&mut matchups, &chips, 30, &mut warnings);

        assert_eq!(matchups[0].home_chip_type, Some(ChipType::WinWin));
        assert_eq!(matchups[0].home_final_league_points, Some(2));
        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("win_win applied"));
    }

    #[test]
    fn challenge_chip_marks_side_without_touching_points() {
        let mut matchups = vec![score_matchup("m1", side("Alpha", 30), side("Beta", 10))];
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "challenge", "challengeOpponentTeamName": "Zeta" }
        }));
        let mut warnings = Warnings::new();

        apply_chips(&mut matchups, &chips, 30, &mut warnings);

        assert_eq!(matchups[0].home_chip_type, Some(ChipType::Challenge));
        assert_eq!(matchups[0].home_final_league_points, Some(2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unmatched_competitive_chip_team_warns() {
        let mut matchups = vec![score_matchup("m1", side("Alpha", 30), side("Beta", 10))];
        let chips = chips(serde_json::json!({ "Nobody": { "chipType": "win_win" } }));
        let mut warnings = Warnings::new();

        apply_chips(&mut matchups, &chips, 30, &mut warnings);

        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("Chip team not found: Nobody"));
    }

    fn bracket() -> Vec<MatchupConfig> {
        serde_json::from_value(serde_json::json!([
            {
                "id": "m1",
                "home": { "name": "Alpha", "managers": [101, 102] },
                "away": { "name": "Beta", "managers": [201, 202] }
            }
        ]))
        .unwrap()
    }

    fn stats(pairs: &[(u32, i32)]) -> HashMap<u32, ManagerStats> {
        pairs
            .iter()
            .map(|&(entry_id, gw_points)| {
                (entry_id, ManagerStats { entry_id, gw_points, players_left_to_play: 0 })
            })
            .collect()
    }

    #[test]
    fn challenge_fixture_scores_both_rosters() {
        let matchups = bracket();
        let mut team_managers = HashMap::new();
        team_managers.insert("Zeta".to_string(), vec![301, 302]);
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "challenge", "challengeOpponentTeamName": "Zeta" }
        }));
        let schedule: CaptainSchedule = serde_json::from_value(serde_json::json!({
            "default": { "m1": { "homeCaptain": 101, "awayCaptain": 201 } }
        }))
        .unwrap();
        let stats = stats(&[(101, 10), (102, 8), (301, 6), (302, 4)]);
        let mut warnings = Warnings::new();

        let fixtures = build_challenge_fixtures(
            30,
            &matchups,
            &team_managers,
            &chips,
            &schedule,
            &SelectionSet::default(),
            &stats,
            &HashMap::new(),
            &mut warnings,
        );

        assert_eq!(fixtures.len(), 1);
        let fixture = &fixtures[0];
        // Alpha keeps its scheduled captain (101, 10 pts): 18 + 10 = 28.
        assert_eq!(fixture.challenger_tvt_points, 28);
        // Zeta has no bracket matchup: fallback boosts its lowest scorer
        // (302, 4 pts): 10 + 4 = 14.
        assert_eq!(fixture.opponent_tvt_points, 14);
        assert_eq!(fixture.challenger_base_league_points, 2);
        assert_eq!(fixture.created_from_chip, ChipType::Challenge);
        assert!(warnings.is_empty());
    }

    #[test]
    fn challenge_without_opponent_is_skipped_with_warning() {
        let matchups = bracket();
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "challenge" }
        }));
        let mut warnings = Warnings::new();

        let fixtures = build_challenge_fixtures(
            30,
            &matchups,
            &HashMap::new(),
            &chips,
            &CaptainSchedule::default(),
            &SelectionSet::default(),
            &HashMap::new(),
            &HashMap::new(),
            &mut warnings,
        );

        assert!(fixtures.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("missing opponent"));
    }

    #[test]
    fn challenge_with_unknown_opponent_is_skipped_with_warning() {
        let matchups = bracket();
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "challenge", "challengeOpponentTeamName": "Ghosts" }
        }));
        let mut warnings = Warnings::new();

        let fixtures = build_challenge_fixtures(
            30,
            &matchups,
            &HashMap::new(),
            &chips,
            &CaptainSchedule::default(),
            &SelectionSet::default(),
            &HashMap::new(),
            &HashMap::new(),
            &mut warnings,
        );

        assert!(fixtures.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings.as_slice()[0].contains("opponent not found: Ghosts"));
    }

    #[test]
    fn tied_challenge_awards_one_point() {
        let matchups = bracket();
        let mut team_managers = HashMap::new();
        team_managers.insert("Zeta".to_string(), vec![301, 302]);
        let chips = chips(serde_json::json!({
            "Alpha": { "chipType": "challenge", "challengeOpponentTeamName": "Zeta" }
        }));
        // Both sides fall back to their lowest scorer; totals end 12 vs 12.
        let stats = stats(&[(101, 4), (102, 4), (301, 4), (302, 4)]);
        let mut warnings = Warnings::new();

        let fixtures = build_challenge_fixtures(
            30,
            &matchups,
            &team_managers,
            &chips,
            &CaptainSchedule::default(),
            &SelectionSet::default(),
            &stats,
            &HashMap::new(),
            &mut warnings,
        );

        assert_eq!(fixtures[0].challenger_tvt_points, 12);
        assert_eq!(fixtures[0].opponent_tvt_points, 12);
        assert_eq!(fixtures[0].challenger_base_league_points, 1);
    }
}
