//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bugboard_core::types::{DbId, Timestamp};

/// Image assigned to accounts that never uploaded one.
pub const DEFAULT_IMAGE: &str = "default.png";

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: String,
    /// Unread notifications since the last reset.
    pub notification_count: i32,
    pub report_count: i32,
    pub fixed_count: i32,
    pub created_at: Timestamp,
}

impl User {
    /// Name shown in event logs and notification texts.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating a user. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
    pub image: Option<String>,
}

/// Lookup filter for users. Empty filter matches everyone.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub ids: Option<Vec<DbId>>,
}
