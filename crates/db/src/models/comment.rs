//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bugboard_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub report_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub posted_at: Timestamp,
}

/// DTO for creating a new comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub report_id: DbId,
    pub author_id: DbId,
    pub content: String,
}

/// Lookup filter for comments. Results are ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub report_id: Option<DbId>,
}
