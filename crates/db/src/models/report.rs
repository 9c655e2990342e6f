//! Report entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bugboard_core::types::{DbId, Timestamp};

/// A row from the `reports` table.
///
/// `status` and `severity` hold the display strings of
/// [`ReportStatus`](bugboard_core::report::ReportStatus) and
/// [`Severity`](bugboard_core::report::Severity). `events` is the serialized
/// audit log; it may be `NULL` for rows written before the log existed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub project_id: DbId,
    pub reporter_id: DbId,
    pub assignee_id: Option<DbId>,
    pub bug: String,
    pub details: String,
    pub status: String,
    pub severity: String,
    pub reproduce_steps: Vec<String>,
    #[serde(skip_serializing)]
    pub events: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub project_id: DbId,
    pub reporter_id: DbId,
    pub bug: String,
    pub details: String,
    pub status: String,
    pub severity: String,
    pub reproduce_steps: Vec<String>,
    pub events: String,
}

/// DTO for updating a report. Only non-`None` fields are applied;
/// `updated_at` is always bumped.
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub status: Option<String>,
    pub assignee_id: Option<DbId>,
    pub events: Option<String>,
}

/// Lookup filter for reports. Results are ordered by `updated_at` then `id`,
/// newest first.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub project_id: Option<DbId>,
    pub reporter_id: Option<DbId>,
    pub assignee_id: Option<DbId>,
}
