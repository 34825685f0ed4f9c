//! The feed synchronization core.
//!
//! Everything that turns user input into consistent, race-free fetches and
//! confirmed mutations lives here:
//!
//! - `query`: the query state holder and the signature used for race
//!   detection
//! - `debounce`: settles the raw search keystream
//! - `store`: the ordered, id-unique record collection
//! - `summary`: human-readable description of the active filters
//! - `controller`: fetch orchestration, mutation handlers, and the
//!   view-facing operation surface

pub mod controller;
pub mod debounce;
pub mod query;
pub mod store;
pub mod summary;

pub use controller::{FeedController, FeedError, FeedOptions};
pub use query::{FeedQuery, QuerySignature, SortOrder};
pub use store::FeedStore;
