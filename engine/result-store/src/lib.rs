//! # Result Store
//!
//! Durable storage for the TVT league: archived per-gameweek score payloads
//! and insert-only captain selections.
//!
//! - **ResultStore**: abstract trait over storage backends
//! - **FileStore**: local file-based implementation (JSON files on disk)
//! - **InMemoryStore**: in-memory implementation for tests

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;

pub use backend::{selection_key, ResultStore};
pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::InMemoryStore;
