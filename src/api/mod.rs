//! Remote API surface for the events backend.
//!
//! The controller never talks HTTP directly; it consumes the [`EventsApi`]
//! trait, which keeps the fetch/mutation seam mockable in tests.
//!
//! ## Structure
//!
//! - `types`: wire types (`EventRecord`, `FeedPage`, `UserProfile`)
//! - `error`: the `ApiError` taxonomy
//! - `traits`: the `EventsApi` trait definition
//! - `http`: `HttpEventsApi`, the reqwest implementation

pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::ApiError;
pub use http::HttpEventsApi;
pub use traits::EventsApi;
pub use types::{EventId, EventRecord, FeedPage, UserId, UserProfile};
