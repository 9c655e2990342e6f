//! Per-report audit trail entries and their serialized form.
//!
//! A report's log is an ordered list of [`ReportEvent`]s stored as one JSON
//! array in the report row. Entries are only ever appended; the helpers here
//! never reorder or drop existing entries.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::report::ReportStatus;
use crate::types::Timestamp;

/// One line of a report's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Display name of the user who acted.
    pub actor: String,
    pub timestamp: Timestamp,
    /// Rendered, human-readable description.
    pub description: String,
}

/// The actions that leave a trace in a report's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportAction {
    InitReport,
    NewComment,
    StatusAction(ReportStatus),
    /// Carries the assignee's display name.
    NewAssignment(String),
}

impl ReportAction {
    /// Render the timeline sentence for this action.
    pub fn describe(&self, actor: &str) -> String {
        match self {
            ReportAction::InitReport => format!("{actor} reported this issue"),
            ReportAction::NewComment => format!("{actor} added a comment"),
            ReportAction::StatusAction(status) => {
                format!("{actor} changed the status to {status}")
            }
            ReportAction::NewAssignment(assignee) => {
                format!("{actor} assigned this issue to {assignee}")
            }
        }
    }
}

/// Build a timestamped event for `actor` performing `action`.
pub fn build_event(actor: &str, action: &ReportAction) -> ReportEvent {
    ReportEvent {
        actor: actor.to_string(),
        timestamp: chrono::Utc::now(),
        description: action.describe(actor),
    }
}

/// Parse a stored log. A missing, blank or JSON `null` blob is an empty log.
pub fn parse_log(raw: Option<&str>) -> Result<Vec<ReportEvent>, serde_json::Error> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json),
    }
}

/// Serialize a log back into its stored form.
pub fn serialize_log(events: &[ReportEvent]) -> Result<String, CoreError> {
    serde_json::to_string(events)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize event log: {e}")))
}
