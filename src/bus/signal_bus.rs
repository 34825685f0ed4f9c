use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::api::EventId;

const BUS_CAPACITY: usize = 256;

/// What changed. Stale fetch responses never produce a signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    /// A page-1 response replaced the whole list.
    ListReplaced { len: usize },
    /// A page>1 response appended records.
    ListAppended { added: usize },
    EventRemoved { id: EventId },
    EventPatched { id: EventId },
    SummaryChanged,
    /// A non-stale fetch failed; the list was left untouched.
    FetchFailed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedSignal {
    pub id: String,
    pub seq: i64,
    pub kind: SignalKind,
    pub created_at: String,
}

pub struct SignalBus {
    tx: broadcast::Sender<FeedSignal>,
    seq: AtomicI64,
}

impl SignalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self {
            tx,
            seq: AtomicI64::new(0),
        }
    }

    /// Build and publish a signal. Publishing with no subscribers is
    /// normal (headless use); the signal is simply dropped.
    pub fn publish(&self, kind: SignalKind) -> FeedSignal {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let signal = FeedSignal {
            id: Uuid::new_v4().to_string(),
            seq,
            kind,
            created_at: Utc::now().to_rfc3339(),
        };
        if self.tx.send(signal.clone()).is_err() {
            tracing::trace!(seq, "signal dropped (no subscribers)");
        }
        signal
    }

    /// Get a new receiver for this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedSignal> {
        self.tx.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
