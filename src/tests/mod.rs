//! Test helpers and utilities shared across the integration-style tests.
//!
//! The mock API hands each incoming call to the test as a pending-call
//! object with a oneshot reply channel, so tests decide the exact order in
//! which completions arrive. That is what makes the race properties
//! testable deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::api::{ApiError, EventId, EventRecord, EventsApi, FeedPage, UserId};
use crate::bus::{FeedSignal, SignalKind};
use crate::feed::query::QuerySignature;



#[cfg(test)]
mod summary;

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// A `fetch_feed` call the controller has issued and the test has not yet
/// answered.
pub struct PendingFeed {
    pub signature: QuerySignature,
    reply: oneshot::Sender<Result<FeedPage, ApiError>>,
}

impl PendingFeed {
    pub fn respond(self, result: Result<FeedPage, ApiError>) {
        let _ = self.reply.send(result);
    }

    /// Respond with a well-formed page for the requested page number.
    pub fn respond_events(self, events: Vec<EventRecord>, more: bool) {
        let page = FeedPage {
            page: self.signature.page,
            count: events.len() as u64,
            events,
            more,
        };
        self.respond(Ok(page));
    }
}

/// A `lookup_user_name` call awaiting an answer.
pub struct PendingLookup {
    pub user: UserId,
    reply: oneshot::Sender<Result<String, ApiError>>,
}

impl PendingLookup {
    pub fn respond(self, result: Result<String, ApiError>) {
        let _ = self.reply.send(result);
    }
}

pub struct MockApi {
    feed_tx: mpsc::UnboundedSender<PendingFeed>,
    lookup_tx: mpsc::UnboundedSender<PendingLookup>,
    delete_script: Mutex<VecDeque<Result<(), ApiError>>>,
    attend_script: Mutex<VecDeque<Result<(), ApiError>>>,
    pub deletes: Mutex<Vec<EventId>>,
    pub attends: Mutex<Vec<(EventId, bool)>>,
}

impl MockApi {
    /// Queue the outcome of the next `delete_event` call (default: success).
    pub fn script_delete(&self, result: Result<(), ApiError>) {
        self.delete_script
            .lock()
            .expect("delete script mutex poisoned")
            .push_back(result);
    }

    /// Queue the outcome of the next `set_attend` call (default: success).
    pub fn script_attend(&self, result: Result<(), ApiError>) {
        self.attend_script
            .lock()
            .expect("attend script mutex poisoned")
            .push_back(result);
    }
}

/// Test-side handle: receives the pending calls the controller issues.
pub struct MockHandle {
    pub feed_calls: mpsc::UnboundedReceiver<PendingFeed>,
    pub lookup_calls: mpsc::UnboundedReceiver<PendingLookup>,
}

impl MockHandle {
    pub async fn next_feed_call(&mut self) -> PendingFeed {
        tokio::time::timeout(WAIT_TIMEOUT, self.feed_calls.recv())
            .await
            .expect("timed out waiting for a feed call")
            .expect("mock api dropped")
    }

    pub fn try_next_feed_call(&mut self) -> Option<PendingFeed> {
        self.feed_calls.try_recv().ok()
    }

    pub async fn next_lookup_call(&mut self) -> PendingLookup {
        tokio::time::timeout(WAIT_TIMEOUT, self.lookup_calls.recv())
            .await
            .expect("timed out waiting for a lookup call")
            .expect("mock api dropped")
    }
}

pub fn mock_api() -> (Arc<MockApi>, MockHandle) {
    let (feed_tx, feed_calls) = mpsc::unbounded_channel();
    let (lookup_tx, lookup_calls) = mpsc::unbounded_channel();
    let api = Arc::new(MockApi {
        feed_tx,
        lookup_tx,
        delete_script: Mutex::new(VecDeque::new()),
        attend_script: Mutex::new(VecDeque::new()),
        deletes: Mutex::new(Vec::new()),
        attends: Mutex::new(Vec::new()),
    });
    (
        api,
        MockHandle {
            feed_calls,
            lookup_calls,
        },
    )
}

#[async_trait]
impl EventsApi for MockApi {
    async fn fetch_feed(&self, query: &QuerySignature) -> Result<FeedPage, ApiError> {
        let (reply, rx) = oneshot::channel();
        let pending = PendingFeed {
            signature: query.clone(),
            reply,
        };
        if self.feed_tx.send(pending).is_err() {
            return Err(ApiError::Network("mock feed channel closed".into()));
        }
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Network("mock response dropped".into())))
    }

    async fn delete_event(&self, id: EventId) -> Result<(), ApiError> {
        self.deletes.lock().expect("deletes mutex poisoned").push(id);
        self.delete_script
            .lock()
            .expect("delete script mutex poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn set_attend(&self, id: EventId, currently_attending: bool) -> Result<bool, ApiError> {
        self.attends
            .lock()
            .expect("attends mutex poisoned")
            .push((id, currently_attending));
        let result = self
            .attend_script
            .lock()
            .expect("attend script mutex poisoned")
            .pop_front()
            .unwrap_or(Ok(()));
        result.map(|_| !currently_attending)
    }

    async fn lookup_user_name(&self, id: UserId) -> Result<String, ApiError> {
        let (reply, rx) = oneshot::channel();
        if self.lookup_tx.send(PendingLookup { user: id, reply }).is_err() {
            return Err(ApiError::Network("mock lookup channel closed".into()));
        }
        rx.await
            .unwrap_or_else(|_| Err(ApiError::Network("mock response dropped".into())))
    }
}

/// A minimal but fully-populated record.
pub fn sample_event(id: EventId) -> EventRecord {
    EventRecord {
        id,
        title: format!("Event {id}"),
        date: NaiveDate::from_ymd_opt(2026, 9, 12).expect("valid date"),
        price: 25.0,
        description: format!("Description for event {id}"),
        image: format!("/img/event-{id}.jpg"),
        address: "1 Main St".to_string(),
        lat: 38.27,
        lng: -0.7,
        attend: false,
        num_attend: 3,
        creator_id: 1,
    }
}

pub fn server_error(status: u16) -> ApiError {
    ApiError::Server {
        status,
        message: "simulated failure".to_string(),
    }
}

/// Receive signals until one matches the predicate. Times out (and fails
/// the test) if the bus goes quiet without a match.
pub async fn wait_for_signal<F>(rx: &mut broadcast::Receiver<FeedSignal>, mut want: F) -> SignalKind
where
    F: FnMut(&SignalKind) -> bool,
{
    loop {
        let signal = tokio::time::timeout(WAIT_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for a signal")
            .expect("signal bus closed");
        if want(&signal.kind) {
            return signal.kind;
        }
    }
}

/// Give spawned controller tasks a chance to run to their next suspension
/// point without advancing past any timers the test controls.
pub async fn drain_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
