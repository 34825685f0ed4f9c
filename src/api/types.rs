//! Wire types shared between the HTTP client and the feed core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type EventId = i64;
pub type UserId = i64;

/// One event as served by the backend.
///
/// Field names on the wire are camelCase (`numAttend`, `creatorId`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub price: f64,
    pub description: String,
    pub image: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    /// Whether the authenticated user attends this event.
    pub attend: bool,
    /// Attendee count; moves in lock-step with `attend` transitions.
    pub num_attend: u32,
    pub creator_id: UserId,
}

/// One page of the feed as returned by `GET /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub events: Vec<EventRecord>,
    /// True while further pages exist beyond this one.
    pub more: bool,
    pub page: u32,
    /// Server-side total across all pages.
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
}

/// Envelope for `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserProfile,
}
