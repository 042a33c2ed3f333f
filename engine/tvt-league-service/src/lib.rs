//! # TVT League Service
//!
//! HTTP service for the TVT fantasy league: live matchup scoring, replayed
//! season standings and captain-selection submissions.
//!
//! ## Architecture
//!
//! - **config**: environment-driven service configuration
//! - **state**: league data files and shared handler state
//! - **live**: per-gameweek scoring orchestration and archiving
//! - **rankings**: baseline-plus-replay standings computation
//! - **rest_api**: warp routes and response shapes

pub mod config;
pub mod live;
pub mod rankings;
pub mod rest_api;
pub mod state;

pub use config::{load_config, ServiceConfig};
pub use live::compute_live_score;
pub use rankings::compute_rankings;
pub use state::{AppState, LeagueFiles};
