//! WebSocket live feeds.
//!
//! Each feed upgrades the connection, opens a broker subscription and
//! streams every matching [`LiveEvent`](bugboard_events::LiveEvent) as a JSON
//! text frame until either side goes away.

mod handler;
mod heartbeat;

pub use handler::{comments_feed, notifications_feed, reports_feed, Feed};
pub use heartbeat::HEARTBEAT_INTERVAL_SECS;
