//! Fetch orchestration, confirm-then-apply mutations, and the operation
//! surface exposed to the hosting view.
//!
//! One controller instance backs one feed view. All list state lives behind
//! a single mutex that is never held across an `.await`, so fetch responses
//! and mutation confirmations apply strictly in the order their completions
//! arrive. Every issued fetch carries a sequence number from an atomic
//! counter; a completion is applied only while its number is still the
//! latest issued one, which is what makes overlapping fetches race-free.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::{ApiError, EventId, EventRecord, EventsApi, FeedPage, UserId};
use crate::bus::{FeedSignal, SignalBus, SignalKind};

use super::debounce::{SearchDebouncer, DEFAULT_SETTLE_WINDOW};
use super::query::{FeedQuery, QuerySignature, SortOrder};
use super::store::FeedStore;
use super::summary;

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum FeedError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("unknown event id {0}")]
    UnknownEvent(EventId),
    #[error("feed controller is closed")]
    Closed,
}

#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Only list events created by this user. Fixed for the controller's
    /// lifetime; its display name is looked up asynchronously for the
    /// filter summary.
    pub creator_filter: Option<UserId>,
    /// Only list events this user attends. Fixed for the controller's
    /// lifetime.
    pub attending_filter: Option<UserId>,
    pub debounce_window: Duration,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            creator_filter: None,
            attending_filter: None,
            debounce_window: DEFAULT_SETTLE_WINDOW,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct FeedState {
    query: FeedQuery,
    store: FeedStore,
    creator_name: Option<String>,
    summary: String,
    last_error: Option<FeedError>,
}

struct Inner {
    api: Arc<dyn EventsApi>,
    bus: SignalBus,
    state: Mutex<FeedState>,
    /// Sequence number of the most recently issued fetch.
    issue_seq: AtomicU64,
    shutdown_rx: watch::Receiver<bool>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().expect("feed state mutex poisoned")
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Snapshot the current signature, stamp it with the next sequence
    /// number, and fetch in a detached task.
    fn spawn_fetch(self: &Arc<Self>) {
        if self.is_shutdown() {
            return;
        }
        // Snapshot and sequence assignment happen under the state lock, so
        // issue order always matches query-mutation order.
        let (signature, seq) = {
            let state = self.state();
            let signature = state.query.signature();
            let seq = self.issue_seq.fetch_add(1, Ordering::SeqCst) + 1;
            (signature, seq)
        };
        tracing::debug!(
            seq,
            page = signature.page,
            search = %signature.search,
            order = %signature.order,
            "issuing feed fetch"
        );

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.api.fetch_feed(&signature).await;
            inner.apply_fetch_completion(seq, &signature, result);
        });
    }

    fn apply_fetch_completion(
        &self,
        seq: u64,
        signature: &QuerySignature,
        result: Result<FeedPage, ApiError>,
    ) {
        if self.is_shutdown() {
            tracing::debug!(seq, "dropping fetch completion after teardown");
            return;
        }
        let mut state = self.state();
        let latest = self.issue_seq.load(Ordering::SeqCst);
        if seq != latest {
            // Superseded while in flight. Not an error, not a success:
            // the response simply never happened.
            tracing::debug!(seq, latest, "discarding stale feed response");
            return;
        }

        match result {
            Ok(page) => {
                state.last_error = None;
                state.store.set_has_more(page.more);
                if signature.page == 1 {
                    state.store.reset(page.events);
                    let len = state.store.len();
                    self.bus.publish(SignalKind::ListReplaced { len });
                } else {
                    let added = state.store.append(page.events);
                    self.bus.publish(SignalKind::ListAppended { added });
                }
            }
            Err(err) => {
                tracing::warn!(%err, seq, "feed fetch failed; list left untouched");
                state.last_error = Some(FeedError::Api(err.clone()));
                self.bus.publish(SignalKind::FetchFailed {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Called by the debouncer with a settled search value.
    fn apply_search(self: &Arc<Self>, value: String) {
        if self.is_shutdown() {
            return;
        }
        let changed = {
            let mut state = self.state();
            let changed = state.query.set_search(value);
            if changed {
                self.refresh_summary(&mut state);
            }
            changed
        };
        if changed {
            self.spawn_fetch();
        }
    }

    fn refresh_summary(&self, state: &mut FeedState) {
        let text = summary::compose(
            state.query.search(),
            state.query.order(),
            state.query.attending().is_some(),
            state.creator_name.as_deref(),
        );
        if text != state.summary {
            state.summary = text;
            self.bus.publish(SignalKind::SummaryChanged);
        }
    }
}

/// Resolve the creator filter's display name for the summary. The sync
/// clauses are never held back while this is pending.
async fn resolve_creator_name(
    inner: Arc<Inner>,
    creator: UserId,
    mut shutdown: watch::Receiver<bool>,
) {
    let result = tokio::select! {
        result = inner.api.lookup_user_name(creator) => result,
        _ = shutdown.changed() => return,
    };
    if inner.is_shutdown() {
        return;
    }
    match result {
        Ok(name) => {
            let mut state = inner.state();
            state.creator_name = Some(name);
            inner.refresh_summary(&mut state);
        }
        Err(err) => {
            tracing::warn!(%err, user = creator, "creator name lookup failed; summary keeps sync clauses only");
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The feed synchronization controller. One instance per hosting view.
pub struct FeedController {
    inner: Arc<Inner>,
    raw_search_tx: mpsc::UnboundedSender<String>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl FeedController {
    /// Build the controller and issue the initial page-1 fetch. Must be
    /// called from within a tokio runtime.
    pub fn new(api: Arc<dyn EventsApi>, options: FeedOptions) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let query = FeedQuery::new(options.creator_filter, options.attending_filter);
        let initial_summary = summary::compose(
            query.search(),
            query.order(),
            query.attending().is_some(),
            None,
        );
        let inner = Arc::new(Inner {
            api,
            bus: SignalBus::new(),
            state: Mutex::new(FeedState {
                query,
                store: FeedStore::new(),
                creator_name: None,
                summary: initial_summary,
                last_error: None,
            }),
            issue_seq: AtomicU64::new(0),
            shutdown_rx: shutdown_rx.clone(),
        });

        let (raw_search_tx, raw_search_rx) = mpsc::unbounded_channel();
        let debouncer = {
            let inner = Arc::clone(&inner);
            SearchDebouncer::start(
                raw_search_rx,
                options.debounce_window,
                shutdown_rx.clone(),
                move |value| inner.apply_search(value),
            )
        };
        let mut tasks = vec![debouncer];
        if let Some(creator) = options.creator_filter {
            tasks.push(tokio::spawn(resolve_creator_name(
                Arc::clone(&inner),
                creator,
                shutdown_rx,
            )));
        }

        // Filters are known from construction onward; fetch right away.
        inner.spawn_fetch();

        Self {
            inner,
            raw_search_tx,
            shutdown_tx,
            tasks: Mutex::new(tasks),
        }
    }

    // -- operations ---------------------------------------------------------

    /// Feed one raw keystroke of search text. The fetch fires only after
    /// the input settles (600 ms quiet, deduplicated).
    pub fn search(&self, text: impl Into<String>) {
        if self.inner.is_shutdown() {
            return;
        }
        if self.raw_search_tx.send(text.into()).is_err() {
            tracing::debug!("search input dropped; debouncer is gone");
        }
    }

    pub fn set_order(&self, order: SortOrder) {
        if self.inner.is_shutdown() {
            return;
        }
        let changed = {
            let mut state = self.inner.state();
            let changed = state.query.set_order(order);
            if changed {
                self.inner.refresh_summary(&mut state);
            }
            changed
        };
        if changed {
            self.inner.spawn_fetch();
        } else {
            tracing::debug!(%order, "order unchanged, skipping refetch");
        }
    }

    /// Request the next page. Ignored while the server reports no further
    /// pages.
    pub fn load_more(&self) {
        if self.inner.is_shutdown() {
            return;
        }
        {
            let mut state = self.inner.state();
            if !state.store.has_more() {
                tracing::debug!("load_more ignored: feed reports no further pages");
                return;
            }
            state.query.next_page();
        }
        self.inner.spawn_fetch();
    }

    /// Jump back to page 1 and refetch; the next successful response
    /// replaces the list. External form collaborators call this after a
    /// confirmed create or edit so the record shows up through a normal
    /// page-1 fetch.
    pub fn reset_to_first_page(&self) {
        if self.inner.is_shutdown() {
            return;
        }
        self.inner.state().query.reset_page();
        self.inner.spawn_fetch();
    }

    /// Reissue the current signature, e.g. to retry after a fetch failure.
    pub fn refresh(&self) {
        if self.inner.is_shutdown() {
            return;
        }
        self.inner.spawn_fetch();
    }

    /// Delete an event remotely; the local record is removed only after
    /// the server confirms. A failed delete leaves the list untouched.
    pub async fn remove(&self, id: EventId) -> Result<(), FeedError> {
        if self.inner.is_shutdown() {
            return Err(FeedError::Closed);
        }
        self.inner.api.delete_event(id).await?;
        if self.inner.is_shutdown() {
            return Err(FeedError::Closed);
        }
        let removed = self.inner.state().store.remove_by_id(id);
        if removed {
            self.inner.bus.publish(SignalKind::EventRemoved { id });
        } else {
            tracing::debug!(event = id, "delete confirmed for an id no longer listed");
        }
        Ok(())
    }

    /// Toggle attendance for an event. The request encodes the current
    /// flag; `attend` and `num_attend` move together only once the server
    /// confirms. Returns the new attending state.
    pub async fn toggle_attend(&self, id: EventId) -> Result<bool, FeedError> {
        if self.inner.is_shutdown() {
            return Err(FeedError::Closed);
        }
        let currently = self
            .inner
            .state()
            .store
            .get(id)
            .map(|event| event.attend)
            .ok_or(FeedError::UnknownEvent(id))?;

        let now_attending = self.inner.api.set_attend(id, currently).await?;
        if self.inner.is_shutdown() {
            return Err(FeedError::Closed);
        }

        let patched = self.inner.state().store.mutate_by_id(id, |event| {
            if event.attend != now_attending {
                event.attend = now_attending;
                event.num_attend = if now_attending {
                    event.num_attend + 1
                } else {
                    event.num_attend.saturating_sub(1)
                };
            }
        });
        if patched {
            self.inner.bus.publish(SignalKind::EventPatched { id });
        } else {
            tracing::debug!(event = id, "attend confirmed for an id no longer listed");
        }
        Ok(now_attending)
    }

    /// Tear down the controller: suppress every still-pending completion
    /// and wait for the long-lived background tasks to exit.
    pub async fn close(&self) {
        let _ = self.shutdown_tx.send(true);
        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().expect("task list mutex poisoned");
            tasks.drain(..).collect()
        };
        for result in futures::future::join_all(handles).await {
            if let Err(err) = result {
                tracing::debug!(%err, "background task ended abnormally during close");
            }
        }
    }

    // -- read-only view state ----------------------------------------------

    pub fn events(&self) -> Vec<EventRecord> {
        self.inner.state().store.events().to_vec()
    }

    pub fn has_more(&self) -> bool {
        self.inner.state().store.has_more()
    }

    pub fn filter_summary(&self) -> String {
        self.inner.state().summary.clone()
    }

    /// The most recent non-stale fetch failure, cleared by the next
    /// successful fetch.
    pub fn last_error(&self) -> Option<FeedError> {
        self.inner.state().last_error.clone()
    }

    pub fn query_signature(&self) -> QuerySignature {
        self.inner.state().query.signature()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_shutdown()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedSignal> {
        self.inner.bus.subscribe()
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        // Backstop for callers that never awaited close(): pending
        // completions check this flag before touching state.
        let _ = self.shutdown_tx.send(true);
    }
}
