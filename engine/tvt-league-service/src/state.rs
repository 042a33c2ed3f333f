//! Shared service state

use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use fpl_fetcher::FplClient;
use result_store::{FileStore, ResultStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tvt_scoring::league::{load_json, CaptainSchedule, ChipsFile, MatchupsFile, TeamsFile};
use tvt_scoring::StandingRow;

/// The league's static configuration files, loaded once at startup
#[derive(Debug, Clone)]
pub struct LeagueFiles {
    pub matchups: MatchupsFile,
    pub captains: CaptainSchedule,
    pub teams: TeamsFile,
    pub chips: ChipsFile,
    pub baseline_a: Vec<StandingRow>,
    pub baseline_b: Vec<StandingRow>,
}

impl LeagueFiles {
    /// Load all league files from the data directory
    ///
    /// The bracket, roster and baseline tables are mandatory; the captain
    /// schedule and chips files default to empty when absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let matchups: MatchupsFile = load_json(data_dir.join("matchups.json"))
            .context("Failed to load matchups.json")?;
        let teams: TeamsFile =
            load_json(data_dir.join("teams.json")).context("Failed to load teams.json")?;
        let baseline_a: Vec<StandingRow> = load_json(data_dir.join("standings_group_a.json"))
            .context("Failed to load standings_group_a.json")?;
        let baseline_b: Vec<StandingRow> = load_json(data_dir.join("standings_group_b.json"))
            .context("Failed to load standings_group_b.json")?;

        let captains_path = data_dir.join("captains.json");
        let captains = if captains_path.exists() {
            load_json(captains_path).context("Failed to load captains.json")?
        } else {
            info!("No captains.json found; all captains come from selections or fallback");
            CaptainSchedule::default()
        };

        let chips_path = data_dir.join("chips.json");
        let chips = if chips_path.exists() {
            load_json(chips_path).context("Failed to load chips.json")?
        } else {
            info!("No chips.json found; no chip modifiers will apply");
            ChipsFile::default()
        };

        info!(
            "League files loaded: {} teams, {} bracket gameweeks, baseline {}+{} rows",
            teams.teams.len(),
            matchups.matchups_by_gameweek.len(),
            baseline_a.len(),
            baseline_b.len()
        );

        Ok(Self { matchups, captains, teams, chips, baseline_a, baseline_b })
    }
}

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    pub fpl: Arc<FplClient>,
    pub store: Arc<dyn ResultStore>,
    pub league: Arc<LeagueFiles>,
}

impl AppState {
    /// Build the production state: file-backed store, league files from the
    /// configured data directory
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let league = Arc::new(LeagueFiles::load(&config.data_dir)?);
        let fpl = Arc::new(FplClient::new(config.fetcher.clone())?);
        let store: Arc<dyn ResultStore> = Arc::new(FileStore::new(config.data_dir.join("store"))?);
        Ok(Self { config, fpl, store, league })
    }

    /// Assemble state from pre-built parts (used by tests)
    pub fn with_parts(
        config: ServiceConfig,
        fpl: Arc<FplClient>,
        store: Arc<dyn ResultStore>,
        league: Arc<LeagueFiles>,
    ) -> Self {
        Self { config, fpl, store, league }
    }
}
