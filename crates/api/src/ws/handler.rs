use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use bugboard_core::types::DbId;
use bugboard_events::{LiveBroker, LiveEvent, Subscription, Topic};
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::heartbeat::heartbeat_interval;

/// One of the live feeds a WebSocket client can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Every newly filed report.
    Reports,
    /// New comments on one report.
    Comments(DbId),
    /// Every notification of every kind.
    Notifications,
}

impl Feed {
    pub fn name(self) -> &'static str {
        match self {
            Feed::Reports => "reports",
            Feed::Comments(_) => "comments",
            Feed::Notifications => "notifications",
        }
    }

    /// Open the broker subscription backing this feed.
    pub fn subscribe(self, broker: &Arc<LiveBroker>) -> Subscription<LiveEvent> {
        match self {
            Feed::Reports => broker.subscribe(&[Topic::NewReport]),
            Feed::Comments(report_id) => broker
                .subscribe_filtered(&[Topic::NewComment], move |event: &LiveEvent| {
                    event.report_id() == Some(report_id)
                }),
            Feed::Notifications => broker.subscribe(&Topic::ALL_NOTIFICATIONS),
        }
    }
}

/// GET /api/v1/ws/reports
pub async fn reports_feed(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    open_feed(ws, state, Feed::Reports)
}

/// GET /api/v1/ws/reports/{id}/comments
pub async fn comments_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> impl IntoResponse {
    open_feed(ws, state, Feed::Comments(report_id))
}

/// GET /api/v1/ws/notifications
pub async fn notifications_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    open_feed(ws, state, Feed::Notifications)
}

fn open_feed(ws: WebSocketUpgrade, state: AppState, feed: Feed) -> Response {
    ws.on_upgrade(move |socket| {
        let subscription = feed.subscribe(&state.broker);
        stream_feed(socket, subscription, feed.name())
    })
}

/// Pump `subscription` into the socket until the client disconnects.
///
/// A sender task forwards events and heartbeat pings; the current task reads
/// inbound frames so close and pong frames are observed. Dropping the
/// subscription on exit unregisters it from the broker.
async fn stream_feed(socket: WebSocket, mut subscription: Subscription<LiveEvent>, feed: &'static str) {
    let subscription_id = subscription.id();
    tracing::info!(subscription_id, feed, "WebSocket feed opened");

    let (mut sink, mut stream) = socket.split();

    let send_task = tokio::spawn(async move {
        let mut heartbeat = heartbeat_interval();
        loop {
            let message = tokio::select! {
                event = subscription.next() => {
                    let Some(event) = event else { break };
                    match serde_json::to_string(&event) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!(subscription_id, error = %e, "Failed to encode live event");
                            continue;
                        }
                    }
                }
                _ = heartbeat.tick() => Message::Ping(Bytes::new()),
            };
            if sink.send(message).await.is_err() {
                tracing::debug!(subscription_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(subscription_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(subscription_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    send_task.abort();
    tracing::info!(subscription_id, feed, "WebSocket feed closed");
}
