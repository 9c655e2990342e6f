use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Interval between heartbeat pings (in seconds).
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Ticker for a connection's heartbeat pings. The first tick fires one full
/// period after the connection opens.
pub(crate) fn heartbeat_interval() -> Interval {
    let period = Duration::from_secs(HEARTBEAT_INTERVAL_SECS);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
