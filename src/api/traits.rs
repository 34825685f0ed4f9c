use async_trait::async_trait;

use super::error::ApiError;
use super::types::{EventId, FeedPage, UserId};
use crate::feed::query::QuerySignature;

/// The remote operations the feed controller depends on.
///
/// Implementations must be `Send + Sync`; the controller holds them behind
/// an `Arc<dyn EventsApi>` and calls them from spawned tasks.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetch one page of the feed for the given query signature.
    async fn fetch_feed(&self, query: &QuerySignature) -> Result<FeedPage, ApiError>;

    /// Delete an event. A non-2xx response fails the whole operation.
    async fn delete_event(&self, id: EventId) -> Result<(), ApiError>;

    /// Toggle attendance. The request encodes only the *current* flag; the
    /// server flips it. Returns the new attending state on success.
    async fn set_attend(&self, id: EventId, currently_attending: bool) -> Result<bool, ApiError>;

    /// Resolve a user's display name.
    async fn lookup_user_name(&self, id: UserId) -> Result<String, ApiError>;
}
