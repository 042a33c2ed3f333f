//! In-memory result store (for testing)

use crate::backend::{selection_key, ResultStore};
use crate::error::{Result, StoreError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tvt_scoring::{CaptainSelection, LiveScorePayload};

/// In-memory store with the same conflict semantics as `FileStore`
#[derive(Default)]
pub struct InMemoryStore {
    results: Mutex<BTreeMap<u32, LiveScorePayload>>,
    selections: Mutex<BTreeMap<String, CaptainSelection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an archived payload, used by tests to stage history
    pub fn with_result(self, gw: u32, payload: LiveScorePayload) -> Self {
        self.results.lock().insert(gw, payload);
        self
    }
}

#[async_trait::async_trait]
impl ResultStore for InMemoryStore {
    async fn load_result(&self, gw: u32) -> Result<Option<LiveScorePayload>> {
        Ok(self.results.lock().get(&gw).cloned())
    }

    async fn save_result(&self, gw: u32, payload: &LiveScorePayload) -> Result<()> {
        self.results.lock().insert(gw, payload.clone());
        Ok(())
    }

    async fn load_results(&self) -> Result<BTreeMap<u32, LiveScorePayload>> {
        Ok(self.results.lock().clone())
    }

    async fn load_selections(&self, gw: u32) -> Result<Vec<CaptainSelection>> {
        Ok(self
            .selections
            .lock()
            .values()
            .filter(|selection| selection.gw == gw)
            .cloned()
            .collect())
    }

    async fn insert_selection(&self, selection: &CaptainSelection) -> Result<()> {
        let key = selection_key(selection.gw, &selection.matchup_id, selection.side);
        let mut selections = self.selections.lock();
        if selections.contains_key(&key) {
            return Err(StoreError::already_exists(key));
        }
        selections.insert(key, selection.clone());
        Ok(())
    }
}
