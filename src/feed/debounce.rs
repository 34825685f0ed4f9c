//! Settles the raw search keystream into deduplicated values.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

/// Quiet window after the last keystroke before a value settles.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(600);

pub struct SearchDebouncer;

impl SearchDebouncer {
    /// Spawn the debounce task.
    ///
    /// Every keystroke restarts the quiet window; once it elapses the
    /// latest value is handed to `on_settled`, unless it equals the last
    /// value that settled (a value that round-trips to its previous state
    /// must not trigger a refetch). The task exits when the input channel
    /// closes or the shutdown flag flips.
    pub fn start<F>(
        mut rx: mpsc::UnboundedReceiver<String>,
        window: Duration,
        mut shutdown: watch::Receiver<bool>,
        mut on_settled: F,
    ) -> JoinHandle<()>
    where
        F: FnMut(String) + Send + 'static,
    {
        tokio::spawn(async move {
            let mut pending: Option<String> = None;
            let mut last_emitted: Option<String> = None;
            let timer = sleep(window);
            tokio::pin!(timer);

            loop {
                tokio::select! {
                    value = rx.recv() => match value {
                        Some(value) => {
                            pending = Some(value);
                            timer.as_mut().reset(Instant::now() + window);
                        }
                        // Input side dropped with the controller.
                        None => break,
                    },
                    _ = timer.as_mut(), if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            if last_emitted.as_deref() == Some(value.as_str()) {
                                tracing::debug!(%value, "search settled on unchanged value, suppressing");
                                continue;
                            }
                            last_emitted = Some(value.clone());
                            on_settled(value);
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }
}
