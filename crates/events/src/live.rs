//! The payload pushed to live subscribers.

use serde::{Deserialize, Serialize};
use bugboard_core::types::DbId;

use crate::broker::{PubSubBroker, Topic};

/// Broker carrying [`LiveEvent`]s, as shared by the API.
pub type LiveBroker = PubSubBroker<LiveEvent>;

/// Reference to the report an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRef {
    pub id: DbId,
}

/// What subscribers receive for every published notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEvent {
    pub topic: Topic,
    /// User who triggered the event.
    pub notifier: DbId,
    /// Display name of [`notifier`](Self::notifier).
    pub author: String,
    /// Project name.
    pub project: String,
    pub report: Option<ReportRef>,
    /// Rendered notification text.
    pub notification: String,
}

impl LiveEvent {
    /// Id of the report this event concerns, if any.
    pub fn report_id(&self) -> Option<DbId> {
        self.report.map(|r| r.id)
    }
}
