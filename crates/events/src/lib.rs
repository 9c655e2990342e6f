//! Bugboard event log, notification fan-out and live publish/subscribe.
//!
//! - [`PubSubBroker`] -- in-process topic broker with filtered subscriptions.
//! - [`LiveEvent`] -- the payload carried by every publication.
//! - [`EventLog`] -- append-only audit trail per report.
//! - [`NotificationDispatcher`] -- persists a notification, bumps unread
//!   counters and publishes the live event.

pub mod broker;
pub mod dispatcher;
pub mod error;
pub mod event_log;
pub mod live;

pub use broker::{PubSubBroker, Subscription, SubscriptionId, Topic};
pub use dispatcher::{NotificationDispatcher, NotificationRequest};
pub use error::EventsError;
pub use event_log::EventLog;
pub use live::{LiveBroker, LiveEvent, ReportRef};
