//! Domain primitives shared by every Bugboard crate.
//!
//! Nothing in here performs I/O: the storage layer, the event services and
//! the HTTP surface all build on these types.

pub mod error;
pub mod notification_text;
pub mod report;
pub mod report_log;
pub mod types;
