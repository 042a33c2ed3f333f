//! Live score orchestration
//!
//! One scoring pass per request: resolve the target gameweek, prefer a
//! finished archive, otherwise aggregate fresh provider data through the
//! scoring engine and archive the outcome. Provider failures degrade to
//! zeros and warnings; the endpoint itself never fails.

use crate::state::AppState;
use fpl_fetcher::models::{unstarted_teams, Bootstrap};
use std::collections::{BTreeSet, HashMap, HashSet};
use tvt_scoring::captain::{resolve_matchup_captains, SelectionSet};
use tvt_scoring::chips::{apply_chips, build_challenge_fixtures};
use tvt_scoring::league::{MatchupConfig, MatchupSideConfig};
use tvt_scoring::matchup::{normalize_payload, score_matchup};
use tvt_scoring::side::{score_side, EXPECTED_MANAGERS_PER_SIDE};
use tvt_scoring::{
    ChallengeFixture, ChipType, GameweekStatus, LiveScorePayload, MatchupScore, MatchupSide,
    Warnings,
};

/// Compute the live-score payload for a request
pub async fn compute_live_score(
    state: &AppState,
    requested_gw: Option<u32>,
    matchup_filter: Option<&str>,
) -> LiveScorePayload {
    let mut warnings = Warnings::new();

    let bootstrap = state.fpl.bootstrap().await;
    if bootstrap.is_none() {
        warnings.push("Failed to fetch FPL bootstrap data; gameweek status unavailable.");
    }
    let active_gw = bootstrap.as_ref().and_then(|b| b.current_gameweek());

    let gw = match requested_gw.or(active_gw) {
        Some(gw) => gw,
        None => match state.league.matchups.max_gameweek() {
            Some(gw) => gw,
            None => {
                warnings.push("No active or configured gameweek; defaulting to gameweek 1.");
                1
            }
        },
    };

    let gw_status = bootstrap.as_ref().and_then(|b| state.fpl.gameweek_status(b, gw));
    let is_past = matches!(active_gw, Some(active) if gw < active);

    // A finished archive is authoritative; a stale one still serves past
    // gameweeks, best effort.
    match state.store.load_result(gw).await {
        Ok(Some(mut payload)) if payload.is_finished() || is_past => {
            if !payload.is_finished() {
                warnings.push(format!(
                    "Archived results for gameweek {} were captured before the gameweek finished.",
                    gw
                ));
            }
            normalize_payload(&mut payload);
            payload.warnings.extend(warnings.into_vec());
            return filter_matchups(payload, matchup_filter);
        }
        Ok(_) => {}
        Err(e) => {
            warnings.push(format!("Failed to read archived results for gameweek {}: {}", gw, e));
        }
    }

    if is_past {
        warnings.push(format!("Archived results for gameweek {} are not available yet.", gw));
        return filter_matchups(
            empty_payload(gw, active_gw, gw_status, warnings),
            matchup_filter,
        );
    }

    let started =
        bootstrap.as_ref().map(|b| state.fpl.has_gameweek_started(b, gw)).unwrap_or(false);
    if matches!(active_gw, Some(active) if gw > active) && !started {
        warnings.push(format!("Gameweek {} has not started yet. Check back later.", gw));
        return filter_matchups(
            empty_payload(gw, active_gw, gw_status, warnings),
            matchup_filter,
        );
    }

    // With bootstrap down the gameweek state is unknown: attempt every
    // provider fetch anyway and let each one degrade on its own.
    let can_fetch_picks = if bootstrap.is_some() { started } else { true };

    let (matchups, challenge_fixtures) =
        score_live_gameweek(state, gw, &bootstrap, can_fetch_picks, &mut warnings).await;

    let mut payload = LiveScorePayload {
        gw,
        active_gw,
        generated_at: state.fpl.now(),
        matchups,
        challenge_fixtures,
        warnings: warnings.into_vec(),
        gw_status,
    };

    // Archive the unfiltered pass; rankings replays read these back.
    if started && !payload.matchups.is_empty() {
        if let Err(e) = state.store.save_result(gw, &payload).await {
            payload
                .warnings
                .push(format!("Failed to archive results for gameweek {}: {}", gw, e));
        }
    }

    filter_matchups(payload, matchup_filter)
}

/// Score one gameweek from fresh provider data
///
/// Shared by the live endpoint and the standings replay for the current
/// gameweek. `can_fetch_picks` gates the picks, event-live and fixtures
/// fetches: false only when bootstrap confirms the gameweek has not
/// started, so none of that data exists yet.
pub(crate) async fn score_live_gameweek(
    state: &AppState,
    gw: u32,
    bootstrap: &Option<Bootstrap>,
    can_fetch_picks: bool,
    warnings: &mut Warnings,
) -> (Vec<MatchupScore>, Vec<ChallengeFixture>) {
    let configs = match state.league.matchups.matchups_for(gw) {
        Some(configs) if !configs.is_empty() => configs.to_vec(),
        _ => {
            warnings.push(format!("No matchups configured for gameweek {}.", gw));
            return (Vec::new(), Vec::new());
        }
    };

    let team_managers = state.league.teams.team_managers();
    let meta = state.league.teams.manager_meta();

    let resolved: Vec<MatchupConfig> = configs
        .iter()
        .map(|config| MatchupConfig {
            id: config.id.clone(),
            home: resolve_side_managers(
                &config.home,
                &config.id,
                MatchupSide::Home,
                &team_managers,
                warnings,
            ),
            away: resolve_side_managers(
                &config.away,
                &config.id,
                MatchupSide::Away,
                &team_managers,
                warnings,
            ),
        })
        .collect();

    let selections = match state.store.load_selections(gw).await {
        Ok(rows) => SelectionSet::new(rows),
        Err(e) => {
            warnings
                .push(format!("Failed to load captain selections for gameweek {}: {}", gw, e));
            SelectionSet::default()
        }
    };

    // Every entry that can appear in a bracket matchup or a challenge
    // fixture, deduplicated in deterministic order.
    let mut entry_ids: BTreeSet<u32> = resolved
        .iter()
        .flat_map(|config| config.home.managers.iter().chain(config.away.managers.iter()))
        .copied()
        .collect();
    if let Some(chips) = state.league.chips.chips_for(gw) {
        for (team_name, entry) in chips {
            for assignment in entry.assignments() {
                if assignment.chip_type != Some(ChipType::Challenge) {
                    continue;
                }
                if let Some(roster) = team_managers.get(team_name) {
                    entry_ids.extend(roster.iter().copied());
                }
                if let Some(opponent) = assignment.challenge_opponent_team_name.as_deref() {
                    if let Some(roster) = team_managers.get(opponent) {
                        entry_ids.extend(roster.iter().copied());
                    }
                }
            }
        }
    }
    let entry_ids: Vec<u32> = entry_ids.into_iter().collect();

    let element_points = if can_fetch_picks {
        match state.fpl.event_live(gw).await {
            Some(live) => live.element_points(),
            None => {
                warnings.push(format!(
                    "Failed to fetch live points for gameweek {}; using entry history totals.",
                    gw
                ));
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    let unstarted = if can_fetch_picks {
        match state.fpl.fixtures(gw).await {
            Some(fixtures) => unstarted_teams(&fixtures, state.fpl.now()),
            None => {
                warnings.push(format!(
                    "Failed to fetch fixtures for gameweek {}; players left to play unavailable.",
                    gw
                ));
                HashSet::new()
            }
        }
    } else {
        HashSet::new()
    };

    let element_to_team =
        bootstrap.as_ref().map(|b| b.element_to_team()).unwrap_or_default();

    let stats = state
        .fpl
        .manager_stats(
            &entry_ids,
            gw,
            can_fetch_picks,
            &element_points,
            &element_to_team,
            &unstarted,
            warnings,
        )
        .await;

    let mut matchups: Vec<MatchupScore> = resolved
        .iter()
        .map(|config| {
            let captains =
                resolve_matchup_captains(&state.league.captains, &selections, gw, &config.id);
            let home = score_side(
                &config.home.name,
                &config.home.managers,
                captains.home,
                &stats,
                &meta,
                &config.id,
                MatchupSide::Home,
                warnings,
            );
            let away = score_side(
                &config.away.name,
                &config.away.managers,
                captains.away,
                &stats,
                &meta,
                &config.id,
                MatchupSide::Away,
                warnings,
            );
            score_matchup(&config.id, home, away)
        })
        .collect();

    let mut challenge_fixtures = Vec::new();
    if let Some(chips) = state.league.chips.chips_for(gw) {
        apply_chips(&mut matchups, chips, gw, warnings);
        challenge_fixtures = build_challenge_fixtures(
            gw,
            &resolved,
            &team_managers,
            chips,
            &state.league.captains,
            &selections,
            &stats,
            &meta,
            warnings,
        );
    }

    (matchups, challenge_fixtures)
}

fn resolve_side_managers(
    side: &MatchupSideConfig,
    matchup_id: &str,
    side_kind: MatchupSide,
    team_managers: &HashMap<String, Vec<u32>>,
    warnings: &mut Warnings,
) -> MatchupSideConfig {
    let mut managers = side.managers.clone();
    if managers.is_empty() {
        managers = team_managers.get(&side.name).cloned().unwrap_or_default();
    }
    if managers.len() != EXPECTED_MANAGERS_PER_SIDE {
        warnings.push(format!(
            "Expected {} managers for {} (matchup={} {}), found {}.",
            EXPECTED_MANAGERS_PER_SIDE,
            side.name,
            matchup_id,
            side_kind.as_str(),
            managers.len()
        ));
    }
    MatchupSideConfig { name: side.name.clone(), managers }
}

fn empty_payload(
    gw: u32,
    active_gw: Option<u32>,
    gw_status: Option<GameweekStatus>,
    warnings: Warnings,
) -> LiveScorePayload {
    LiveScorePayload {
        gw,
        active_gw,
        generated_at: chrono::Utc::now(),
        matchups: Vec::new(),
        challenge_fixtures: Vec::new(),
        warnings: warnings.into_vec(),
        gw_status,
    }
}

fn filter_matchups(mut payload: LiveScorePayload, filter: Option<&str>) -> LiveScorePayload {
    if let Some(id) = filter {
        payload.matchups.retain(|matchup| matchup.id == id);
    }
    payload
}
