//! Local file-based result store
//!
//! Layout under the store root:
//!
//! ```text
//! results/gw-{gw}.json
//! selections/gw-{gw}/{matchup_id}-{side}.json
//! ```
//!
//! Selection files are created with `create_new`, so the filesystem itself
//! enforces the insert-only rule even across concurrent writers.

use crate::backend::ResultStore;
use crate::error::{Result, StoreError};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tvt_scoring::{CaptainSelection, LiveScorePayload};

/// File-backed result store
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory tree
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join("results"))?;
        std::fs::create_dir_all(root.join("selections"))?;
        info!("Result store opened at {:?}", root);
        Ok(Self { root })
    }

    fn result_path(&self, gw: u32) -> PathBuf {
        self.root.join("results").join(format!("gw-{gw}.json"))
    }

    fn selection_path(&self, selection: &CaptainSelection) -> PathBuf {
        self.root
            .join("selections")
            .join(format!("gw-{}", selection.gw))
            .join(format!("{}-{}.json", sanitize(&selection.matchup_id), selection.side.as_str()))
    }
}

/// Restrict a matchup id to filename-safe characters
fn sanitize(id: &str) -> String {
    id.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' }).collect()
}

/// Parse a gameweek number out of a `gw-{n}.json` filename
fn gameweek_from_filename(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("gw-")?.strip_suffix(".json")?.parse().ok()
}

#[async_trait::async_trait]
impl ResultStore for FileStore {
    async fn load_result(&self, gw: u32) -> Result<Option<LiveScorePayload>> {
        let path = self.result_path(gw);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let payload = serde_json::from_slice(&bytes)?;
        Ok(Some(payload))
    }

    async fn save_result(&self, gw: u32, payload: &LiveScorePayload) -> Result<()> {
        let path = self.result_path(gw);
        let bytes = serde_json::to_vec_pretty(payload)?;
        // Write-then-rename so concurrent readers never see a torn file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        debug!("Archived result for gw={} at {:?}", gw, path);
        Ok(())
    }

    async fn load_results(&self) -> Result<BTreeMap<u32, LiveScorePayload>> {
        let mut results = BTreeMap::new();
        for entry in std::fs::read_dir(self.root.join("results"))? {
            let path = entry?.path();
            let Some(gw) = gameweek_from_filename(&path) else {
                continue;
            };
            let bytes = std::fs::read(&path)?;
            let payload: LiveScorePayload = serde_json::from_slice(&bytes)?;
            results.insert(gw, payload);
        }
        Ok(results)
    }

    async fn load_selections(&self, gw: u32) -> Result<Vec<CaptainSelection>> {
        let dir = self.root.join("selections").join(format!("gw-{gw}"));
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut selections = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            selections.push(serde_json::from_slice(&bytes)?);
        }
        Ok(selections)
    }

    async fn insert_selection(&self, selection: &CaptainSelection) -> Result<()> {
        let path = self.selection_path(selection);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(selection)?;
        let result = std::fs::OpenOptions::new().write(true).create_new(true).open(&path);
        match result {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(&bytes)?;
                debug!(
                    "Recorded captain selection gw={} matchup={} side={}",
                    selection.gw,
                    selection.matchup_id,
                    selection.side.as_str()
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StoreError::already_exists(crate::backend::selection_key(
                    selection.gw,
                    &selection.matchup_id,
                    selection.side,
                )))
            }
            Err(e) => Err(e.into()),
        }
    }
}
