//! Gatherly feed synchronization engine.
//!
//! This is the headless core of the Gatherly events client: everything
//! needed to keep a paginated, filterable, sortable event feed consistent
//! under overlapping asynchronous operations. It handles:
//! - Query state (search text, sort order, page, scope filters)
//! - Debounced, deduplicated search input
//! - Race-free fetch orchestration (last-issued-signature wins)
//! - Confirm-then-apply mutations (delete, attend-toggle)
//! - Change notifications for the hosting view
//!
//! # Architecture
//!
//! The crate follows a modular architecture:
//! - `api`: wire types, the `EventsApi` seam, and the reqwest client
//! - `bus`: broadcast-based change signals for the hosting view
//! - `config`: environment-driven client configuration
//! - `feed`: query state, debouncing, the list store, filter summaries,
//!   and the controller itself
//!
//! The `feed_probe` binary drives the controller against a live backend
//! and stands in for a hosting view.

pub mod api;
pub mod bus;
pub mod config;
pub mod feed;

#[cfg(test)]
mod tests;

pub use api::{ApiError, EventRecord, EventsApi, FeedPage, HttpEventsApi};
pub use bus::{FeedSignal, SignalKind};
pub use config::ClientConfig;
pub use feed::{FeedController, FeedError, FeedOptions, SortOrder};
