//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bugboard_core::types::{DbId, Timestamp};

/// Department used when a project is created without one.
pub const DEFAULT_DEPARTMENT: &str = "general";

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub department: String,
    pub manager_id: Option<DbId>,
    pub member_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub department: String,
    pub manager_id: Option<DbId>,
    pub member_ids: Vec<DbId>,
}

/// Lookup filter for projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub name: Option<String>,
}
