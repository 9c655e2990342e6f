//! In-process topic broker.
//!
//! [`PubSubBroker`] keeps a registry of listeners per [`Topic`]. Every
//! listener owns a bounded queue; [`publish`](PubSubBroker::publish) pushes a
//! clone of the payload into each accepting listener's queue without waiting,
//! so a slow subscriber loses events instead of stalling the publisher.
//!
//! A [`Subscription`] is a [`Stream`] of payloads. Dropping it removes its
//! listeners from the registry.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A named broker channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    NewReport,
    NewComment,
    ReportStatusUpdate,
    NewAssignment,
}

impl Topic {
    /// Every topic a notification can be published on.
    pub const ALL_NOTIFICATIONS: [Topic; 4] = [
        Topic::NewReport,
        Topic::NewComment,
        Topic::ReportStatusUpdate,
        Topic::NewAssignment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::NewReport => "NEW_REPORT",
            Topic::NewComment => "NEW_COMMENT",
            Topic::ReportStatusUpdate => "REPORT_STATUS_UPDATE",
            Topic::NewAssignment => "NEW_ASSIGNMENT",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PubSubBroker
// ---------------------------------------------------------------------------

/// Identifies one subscription in the broker registry.
pub type SubscriptionId = u64;

type Filter<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// Queue depth per subscriber.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct Listener<P> {
    id: SubscriptionId,
    filter: Option<Filter<P>>,
    sender: mpsc::Sender<P>,
}

/// Topic-based fan-out hub, shared as `Arc<PubSubBroker<P>>`.
///
/// The registry lock is a `std::sync::RwLock` and is never held across an
/// `.await`, which lets [`Subscription`] unregister itself from `Drop`.
pub struct PubSubBroker<P> {
    registry: RwLock<HashMap<Topic, Vec<Listener<P>>>>,
    next_id: AtomicU64,
    queue_capacity: usize,
}

impl<P> PubSubBroker<P>
where
    P: Clone + Send + 'static,
{
    /// Create a broker whose subscribers buffer at most `queue_capacity`
    /// undelivered payloads each.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            registry: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Deliver `payload` to every subscriber of `topic` whose filter accepts
    /// it. Returns how many subscribers received it.
    ///
    /// With no subscribers this does nothing. There is no replay: a
    /// subscription only sees payloads published after it was created.
    pub fn publish(&self, topic: Topic, payload: P) -> usize {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = registry.get(&topic) else {
            return 0;
        };

        let mut delivered = 0;
        for listener in listeners {
            if let Some(filter) = &listener.filter {
                if !filter(&payload) {
                    continue;
                }
            }
            match listener.sender.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscription_id = listener.id,
                        %topic,
                        "Subscriber queue full, dropping event"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(subscription_id = listener.id, %topic, "Subscriber gone");
                }
            }
        }
        delivered
    }

    /// Subscribe to every payload published on `topics`.
    pub fn subscribe(self: &Arc<Self>, topics: &[Topic]) -> Subscription<P> {
        self.register(topics, None)
    }

    /// Subscribe to payloads on `topics` for which `filter` returns `true`.
    pub fn subscribe_filtered<F>(self: &Arc<Self>, topics: &[Topic], filter: F) -> Subscription<P>
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.register(topics, Some(Arc::new(filter)))
    }

    fn register(self: &Arc<Self>, topics: &[Topic], filter: Option<Filter<P>>) -> Subscription<P> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.queue_capacity);

        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        let mut seen = Vec::with_capacity(topics.len());
        for &topic in topics {
            if seen.contains(&topic) {
                continue;
            }
            seen.push(topic);
            registry.entry(topic).or_default().push(Listener {
                id,
                filter: filter.clone(),
                sender: sender.clone(),
            });
        }
        drop(registry);

        tracing::debug!(subscription_id = id, topics = ?seen, "Subscription opened");

        Subscription {
            id,
            receiver,
            broker: Arc::downgrade(self),
        }
    }

    /// Remove every listener belonging to `id`. Returns `false` when nothing
    /// was registered under it, so repeated calls are harmless.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        let mut removed = false;
        registry.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|l| l.id != id);
            removed |= listeners.len() != before;
            !listeners.is_empty()
        });
        if removed {
            tracing::debug!(subscription_id = id, "Subscription closed");
        }
        removed
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

impl<P> Default for PubSubBroker<P>
where
    P: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A live feed of payloads for one or more topics.
pub struct Subscription<P>
where
    P: Clone + Send + 'static,
{
    id: SubscriptionId,
    receiver: mpsc::Receiver<P>,
    broker: Weak<PubSubBroker<P>>,
}

impl<P> Subscription<P>
where
    P: Clone + Send + 'static,
{
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next payload. `None` once the broker is gone.
    pub async fn recv(&mut self) -> Option<P> {
        self.receiver.recv().await
    }
}

impl<P> Stream for Subscription<P>
where
    P: Clone + Send + 'static,
{
    type Item = P;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<P>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl<P> Drop for Subscription<P>
where
    P: Clone + Send + 'static,
{
    fn drop(&mut self) {
        if let Some(broker) = self.broker.upgrade() {
            broker.unsubscribe(self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
