//! FPL Fetcher
//!
//! Read-only client for the upstream Fantasy Premier League API. Every
//! endpoint is cached behind an explicit TTL cache with an injected clock,
//! fetched with a timeout, retried exactly once on failure and degraded to
//! `None` on a second failure; the caller substitutes safe defaults and
//! records a warning instead of failing the request.

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod models;

pub use cache::TtlCache;
pub use client::FplClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FetcherConfig;
pub use models::{Bootstrap, EntryEventPicks, Event, EventLive, Fixture};
