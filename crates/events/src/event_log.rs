//! Append-only audit trail per report.
//!
//! The log lives in the report row as one serialized blob. [`EventLog`]
//! produces the new blob; persisting it is left to the caller, which writes
//! it together with the rest of the report update.
//!
//! `append` is a read-modify-write with no transactional guard: two
//! concurrent mutations on the same report can both read the same log and
//! the later write wins, losing one entry.

use std::sync::Arc;

use bugboard_core::error::CoreError;
use bugboard_core::report_log::{parse_log, serialize_log, ReportEvent};
use bugboard_core::types::DbId;
use bugboard_db::models::report::Report;
use bugboard_db::Store;

use crate::error::EventsResult;

#[derive(Clone)]
pub struct EventLog {
    store: Arc<dyn Store>,
}

impl EventLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Serialized log holding only `event`, for a report not yet saved.
    pub fn new_log(event: ReportEvent) -> Result<String, CoreError> {
        serialize_log(&[event])
    }

    /// Load the log of `report_id`, add `event` at the tail and return the
    /// re-serialized log. Does not write it back.
    pub async fn append(&self, report_id: DbId, event: ReportEvent) -> EventsResult<String> {
        let report = self.load_report(report_id).await?;
        let mut events = decode(&report)?;
        events.push(event);
        Ok(serialize_log(&events)?)
    }

    /// Decoded log of `report_id`, oldest first.
    pub async fn events(&self, report_id: DbId) -> EventsResult<Vec<ReportEvent>> {
        let report = self.load_report(report_id).await?;
        Ok(decode(&report)?)
    }

    async fn load_report(&self, report_id: DbId) -> EventsResult<Report> {
        self.store
            .get_report(report_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "report",
                    id: report_id,
                }
                .into()
            })
    }
}

/// Decode the log stored on `report`.
pub fn decode(report: &Report) -> Result<Vec<ReportEvent>, CoreError> {
    parse_log(report.events.as_deref()).map_err(|e| {
        tracing::error!(report_id = report.id, error = %e, "Corrupt event log");
        CoreError::Internal(format!("Corrupt event log on report {}: {e}", report.id))
    })
}
