//! Change notifications for the hosting view.
//!
//! The controller publishes a [`FeedSignal`] whenever the list, the filter
//! summary, or the failure state changes. A view subscribes once and
//! re-renders on each signal; signals carry enough detail to know what
//! changed without shipping the list itself.

mod signal_bus;

pub use signal_bus::{FeedSignal, SignalBus, SignalKind};
