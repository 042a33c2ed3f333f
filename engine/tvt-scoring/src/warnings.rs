//! Shared warnings collector
//!
//! Expected, recoverable anomalies (missing config, unknown teams, degraded
//! provider data) are collected here instead of short-circuiting the scoring
//! pass. The collector is threaded by mutable reference through the call
//! graph and merged into the response payload.

/// Collector for human-readable, non-fatal anomaly messages
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    items: Vec<String>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and emit it to the log
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.items.push(message);
    }

    /// Merge another collector's messages into this one
    pub fn extend(&mut self, other: Warnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
