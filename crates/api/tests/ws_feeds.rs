//! Tests for the live feeds behind the WebSocket routes.
//!
//! These open each [`Feed`] on the application's broker without performing
//! an HTTP upgrade, then drive the REST endpoints and check what the feed
//! would stream to the socket.

mod common;

use std::time::Duration;

use bugboard_api::ws::Feed;
use bugboard_events::{LiveEvent, Subscription, Topic};
use common::{build_test_app, file_report, post_json, put_json, seed_project, seed_user};
use futures::StreamExt;
use serde_json::json;

/// Assert nothing more arrives on `subscription` within a short window.
async fn assert_idle(subscription: &mut Subscription<LiveEvent>) {
    let next = tokio::time::timeout(Duration::from_millis(50), subscription.next()).await;
    assert!(next.is_err(), "unexpected event: {next:?}");
}

// ---------------------------------------------------------------------------
// Test: comments feed only streams comments on its own report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comments_feed_ignores_other_reports() {
    let (app, state) = build_test_app();
    let (_, ann_cookie) = seed_user(&state, "Ann", "Lee").await;
    let (_, bob_cookie) = seed_user(&state, "Bob", "Stone").await;
    let project = seed_project(&state, "Apollo", None, vec![]).await;
    let watched = file_report(&app, &ann_cookie, project, "Crash on save").await;
    let other = file_report(&app, &ann_cookie, project, "Slow search").await;

    let mut feed = Feed::Comments(watched).subscribe(&state.broker);

    for report_id in [other, watched] {
        post_json(
            &app,
            &format!("/api/v1/reports/{report_id}/comments"),
            json!({ "content": "Same here" }),
            Some(&bob_cookie),
        )
        .await;
    }

    let event = feed.next().await.expect("comment on the watched report");
    assert_eq!(event.topic, Topic::NewComment);
    assert_eq!(event.report_id(), Some(watched));
    assert_eq!(event.author, "Bob Stone");
    assert_idle(&mut feed).await;
}

// ---------------------------------------------------------------------------
// Test: reports feed only streams new reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reports_feed_streams_new_reports_only() {
    let (app, state) = build_test_app();
    let (_, cookie) = seed_user(&state, "Ann", "Lee").await;
    let project = seed_project(&state, "Apollo", None, vec![]).await;

    let mut feed = Feed::Reports.subscribe(&state.broker);
    let report_id = file_report(&app, &cookie, project, "Crash").await;
    post_json(
        &app,
        &format!("/api/v1/reports/{report_id}/comments"),
        json!({ "content": "Details" }),
        Some(&cookie),
    )
    .await;

    let event = feed.next().await.expect("new report event");
    assert_eq!(event.topic, Topic::NewReport);
    assert_eq!(event.project, "Apollo");
    assert_eq!(event.author, "Ann Lee");
    assert_idle(&mut feed).await;
}

// ---------------------------------------------------------------------------
// Test: notifications feed streams all four kinds in order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_feed_spans_every_topic() {
    let (app, state) = build_test_app();
    let (_, ann_cookie) = seed_user(&state, "Ann", "Lee").await;
    let (bob, _) = seed_user(&state, "Bob", "Stone").await;
    let project = seed_project(&state, "Apollo", None, vec![]).await;

    let mut feed = Feed::Notifications.subscribe(&state.broker);

    let report_id = file_report(&app, &ann_cookie, project, "Crash").await;
    post_json(
        &app,
        &format!("/api/v1/reports/{report_id}/comments"),
        json!({ "content": "Seen it again" }),
        Some(&ann_cookie),
    )
    .await;
    put_json(
        &app,
        &format!("/api/v1/reports/{report_id}/status"),
        json!({ "status": "IN PROGRESS" }),
        Some(&ann_cookie),
    )
    .await;
    put_json(
        &app,
        &format!("/api/v1/reports/{report_id}/assignee"),
        json!({ "user_id": bob }),
        Some(&ann_cookie),
    )
    .await;

    let mut topics = Vec::new();
    for _ in 0..4 {
        let event = feed.next().await.expect("notification event");
        assert_eq!(event.report_id(), Some(report_id));
        topics.push(event.topic);
    }
    assert_eq!(topics, Topic::ALL_NOTIFICATIONS);
    assert_idle(&mut feed).await;
}

// ---------------------------------------------------------------------------
// Test: closing a feed unregisters it from the broker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dropping_a_feed_unsubscribes() {
    let (_app, state) = build_test_app();

    let feed = Feed::Notifications.subscribe(&state.broker);
    for topic in Topic::ALL_NOTIFICATIONS {
        assert_eq!(state.broker.subscriber_count(topic), 1);
    }

    drop(feed);
    for topic in Topic::ALL_NOTIFICATIONS {
        assert_eq!(state.broker.subscriber_count(topic), 0);
    }
}

#[test]
fn feed_names_label_the_connection() {
    assert_eq!(Feed::Reports.name(), "reports");
    assert_eq!(Feed::Comments(5).name(), "comments");
    assert_eq!(Feed::Notifications.name(), "notifications");
}
