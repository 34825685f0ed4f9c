//! Filter-summary behavior, including the asynchronous creator-name
//! lookup that must never hold back the synchronous clauses.

use pretty_assertions::assert_eq;

use super::{drain_tasks, mock_api, server_error, wait_for_signal};
use crate::bus::SignalKind;
use crate::feed::{FeedController, FeedOptions, SortOrder};

#[tokio::test(start_paused = true)]
async fn fresh_controller_reports_no_filters() {
    let (api, _handle) = mock_api();
    let controller = FeedController::new(api, FeedOptions::default());
    assert_eq!(controller.filter_summary(), "No filters applied.");
}

#[tokio::test(start_paused = true)]
async fn attending_scope_is_reported_synchronously() {
    let (api, _handle) = mock_api();
    let controller = FeedController::new(
        api,
        FeedOptions {
            attending_filter: Some(3),
            ..FeedOptions::default()
        },
    );
    assert_eq!(controller.filter_summary(), "Showing attending only.");
}

#[tokio::test(start_paused = true)]
async fn creator_clause_appends_once_the_lookup_resolves() {
    let (api, mut handle) = mock_api();
    let controller = FeedController::new(
        api,
        FeedOptions {
            creator_filter: Some(7),
            ..FeedOptions::default()
        },
    );
    let mut rx = controller.subscribe();

    // The lookup is issued immediately; the test leaves it pending while
    // the user keeps filtering.
    let lookup = handle.next_lookup_call().await;
    assert_eq!(lookup.user, 7);

    controller.search("jazz");
    wait_for_signal(&mut rx, |k| matches!(k, SignalKind::SummaryChanged)).await;
    controller.set_order(SortOrder::Date);
    wait_for_signal(&mut rx, |k| matches!(k, SignalKind::SummaryChanged)).await;

    assert_eq!(
        controller.filter_summary(),
        "Searching by: \"jazz\". Ordering by: date.",
        "sync clauses must not wait for the name lookup"
    );

    lookup.respond(Ok("Ann".to_string()));
    wait_for_signal(&mut rx, |k| matches!(k, SignalKind::SummaryChanged)).await;
    assert_eq!(
        controller.filter_summary(),
        "Searching by: \"jazz\". Ordering by: date. Events created by: User Ann."
    );
}

#[tokio::test(start_paused = true)]
async fn failed_lookup_keeps_the_sync_clauses_only() {
    let (api, mut handle) = mock_api();
    let controller = FeedController::new(
        api,
        FeedOptions {
            creator_filter: Some(7),
            attending_filter: Some(3),
            ..FeedOptions::default()
        },
    );
    let mut rx = controller.subscribe();

    let lookup = handle.next_lookup_call().await;
    lookup.respond(Err(server_error(500)));
    drain_tasks().await;

    assert_eq!(controller.filter_summary(), "Showing attending only.");
    assert!(rx.try_recv().is_err(), "a failed lookup changes nothing");
}

#[tokio::test(start_paused = true)]
async fn clause_order_is_stable() {
    let (api, mut handle) = mock_api();
    let controller = FeedController::new(
        api,
        FeedOptions {
            creator_filter: Some(7),
            attending_filter: Some(3),
            ..FeedOptions::default()
        },
    );
    let mut rx = controller.subscribe();

    handle.next_lookup_call().await.respond(Ok("Ann".to_string()));
    wait_for_signal(&mut rx, |k| matches!(k, SignalKind::SummaryChanged)).await;

    assert_eq!(
        controller.filter_summary(),
        "Showing attending only. Events created by: User Ann."
    );
}
