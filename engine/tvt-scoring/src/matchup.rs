//! Matchup scoring
//!
//! Combines two aggregated sides into a matchup result and derives the base
//! league-point outcome: win 2, draw 1, loss 0. The scheme is fixed.

use crate::models::{CaptainStatus, LiveScorePayload, MatchupScore, SideScore};
use crate::side::fallback_captain;

/// Base league points for a pair of side totals, as `(home, away)`
pub fn base_league_points(home_total: i32, away_total: i32) -> (u8, u8) {
    if home_total > away_total {
        (2, 0)
    } else if home_total < away_total {
        (0, 2)
    } else {
        (1, 1)
    }
}

/// Build a matchup result from its two scored sides
///
/// Final league points start equal to base; chips may overwrite them later.
pub fn score_matchup(id: &str, home: SideScore, away: SideScore) -> MatchupScore {
    let (home_base, away_base) = base_league_points(home.total_points, away.total_points);
    MatchupScore {
        id: id.to_string(),
        home,
        away,
        home_base_league_points: Some(home_base),
        away_base_league_points: Some(away_base),
        home_final_league_points: Some(home_base),
        away_final_league_points: Some(away_base),
        home_chip_type: None,
        away_chip_type: None,
    }
}

/// Effective league points for a matchup, as `(home, away)`
///
/// Prefers the final league points; payloads written before chips existed
/// omit them, in which case the base 2/1/0 rule is recomputed from totals.
pub fn league_points(matchup: &MatchupScore) -> (u8, u8) {
    match (matchup.home_final_league_points, matchup.away_final_league_points) {
        (Some(home), Some(away)) => (home, away),
        _ => base_league_points(matchup.home.total_points, matchup.away.total_points),
    }
}

/// Normalize an archived payload written by an older scoring pass
///
/// Backfills missing league-point fields from raw totals and applies the
/// lowest-scorer fallback captain to sides that were still pending when the
/// payload was captured. Also guarantees the challenge-fixtures list exists.
pub fn normalize_payload(payload: &mut LiveScorePayload) {
    for matchup in &mut payload.matchups {
        if matchup.home_base_league_points.is_none() || matchup.away_base_league_points.is_none()
        {
            let (home_base, away_base) =
                base_league_points(matchup.home.total_points, matchup.away.total_points);
            matchup.home_base_league_points = Some(home_base);
            matchup.away_base_league_points = Some(away_base);
            matchup.home_final_league_points = Some(home_base);
            matchup.away_final_league_points = Some(away_base);
        }
        normalize_side(&mut matchup.home);
        normalize_side(&mut matchup.away);
    }
}

fn normalize_side(side: &mut SideScore) {
    if side.captain_entry_id.is_some() || side.captain_status != CaptainStatus::Pending {
        return;
    }
    let Some(captain_id) = fallback_captain(&side.managers) else {
        return;
    };
    let mut captain_bonus = 0;
    for manager in &mut side.managers {
        manager.is_captain = manager.entry_id == captain_id;
        if manager.is_captain {
            captain_bonus = manager.gw_points;
        }
    }
    side.captain_entry_id = Some(captain_id);
    side.captain_bonus = captain_bonus;
    side.total_points = side.base_points + captain_bonus;
}
