//! # TVT Scoring Engine
//!
//! Core scoring and ranking engine for the TVT fantasy league. This crate is
//! pure computation: it resolves captains, aggregates two-manager sides into
//! matchup totals, applies chip modifiers, spawns challenge fixtures and
//! folds finished gameweeks into season standings.
//!
//! Everything fallible-but-expected (missing config, unknown teams, absent
//! captains) degrades to a documented fallback and records a warning; only
//! malformed captain-selection submissions are hard errors.

pub mod captain;
pub mod chips;
pub mod error;
pub mod league;
pub mod matchup;
pub mod models;
pub mod side;
pub mod standings;
pub mod warnings;

pub use captain::{ResolvedCaptain, SelectionError, SelectionRequest, SelectionSet};
pub use error::{Result, ScoringError};
pub use models::{
    ArchivedStatus, CaptainSelection, CaptainStatus, ChallengeFixture, ChipType,
    GameweekStatus, LiveScorePayload, ManagerEntry, ManagerMeta, ManagerStats, MatchupScore,
    MatchupSide, ResultSource, SideScore, SourceSummary, StandingRow, StandingsPayload,
};
pub use warnings::Warnings;
