//! Standings computation
//!
//! Standings are never stored. Every request starts from the baseline
//! snapshot and replays each gameweek after it up to the target: archived
//! payloads first, a fresh live pass for the current gameweek, and a warning
//! plus skip for gameweeks with nothing to replay. A skipped gameweek does
//! not count as played.

use crate::state::AppState;
use std::collections::BTreeMap;
use tvt_scoring::matchup::normalize_payload;
use tvt_scoring::standings::{baseline_sorted, StandingsAccumulator};
use tvt_scoring::{ArchivedStatus, ResultSource, SourceSummary, StandingsPayload, Warnings};

/// Compute the ranked standings payload for a request
pub async fn compute_rankings(state: &AppState, requested_gw: Option<u32>) -> StandingsPayload {
    let mut warnings = Warnings::new();

    let bootstrap = state.fpl.bootstrap().await;
    let active_gw = bootstrap.as_ref().and_then(|b| b.current_gameweek());
    let baseline_gw = state.config.baseline_gw;
    let gw = requested_gw.or(active_gw).unwrap_or(baseline_gw);

    if gw <= baseline_gw {
        return StandingsPayload {
            gw,
            baseline_gw,
            group_a: baseline_sorted(&state.league.baseline_a),
            group_b: baseline_sorted(&state.league.baseline_b),
            warnings: warnings.into_vec(),
            source_summary: Vec::new(),
        };
    }

    let mut archived = match state.store.load_results().await {
        Ok(results) => results,
        Err(e) => {
            warnings.push(format!("Failed to read archived results: {}", e));
            BTreeMap::new()
        }
    };

    let mut accumulator =
        StandingsAccumulator::new(&state.league.baseline_a, &state.league.baseline_b);
    let mut source_summary = Vec::new();

    for replay_gw in (baseline_gw + 1)..=gw {
        let (matchups, summary) = match archived.remove(&replay_gw) {
            Some(mut payload) => {
                let status = if payload.is_finished() {
                    ArchivedStatus::Finished
                } else {
                    warnings.push(format!(
                        "Archived results for gameweek {} were captured before it finished; standings may change.",
                        replay_gw
                    ));
                    ArchivedStatus::Live
                };
                normalize_payload(&mut payload);
                (
                    payload.matchups,
                    SourceSummary {
                        gw: replay_gw,
                        source: ResultSource::Archived,
                        archived_status: Some(status),
                    },
                )
            }
            None => {
                let started = bootstrap
                    .as_ref()
                    .map(|b| state.fpl.has_gameweek_started(b, replay_gw))
                    .unwrap_or(false);
                if started || active_gw == Some(replay_gw) {
                    let (matchups, _) = crate::live::score_live_gameweek(
                        state,
                        replay_gw,
                        &bootstrap,
                        started,
                        &mut warnings,
                    )
                    .await;
                    (
                        matchups,
                        SourceSummary {
                            gw: replay_gw,
                            source: ResultSource::Live,
                            archived_status: None,
                        },
                    )
                } else {
                    warnings.push(format!(
                        "No results available for gameweek {}; skipped in standings.",
                        replay_gw
                    ));
                    continue;
                }
            }
        };

        // The summary records where each replayed gameweek came from, even
        // when the payload carries no matchups to fold in.
        source_summary.push(summary);

        if matchups.is_empty() {
            continue;
        }

        accumulator.begin_gameweek();
        for matchup in &matchups {
            accumulator.apply_matchup(matchup, &mut warnings);
        }
    }

    let (group_a, group_b) = accumulator.finish();
    StandingsPayload {
        gw,
        baseline_gw,
        group_a,
        group_b,
        warnings: warnings.into_vec(),
        source_summary,
    }
}
