//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bugboard_core::types::{DbId, Timestamp};

/// A row from the `notifications` table. Written once, never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub created_at: Timestamp,
    pub text: String,
    pub project_id: DbId,
    pub report_id: Option<DbId>,
    pub notifier_id: DbId,
}

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub text: String,
    pub project_id: DbId,
    pub report_id: Option<DbId>,
    pub notifier_id: DbId,
}
