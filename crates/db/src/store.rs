//! The repository interface every storage backend implements.
//!
//! Services receive an `Arc<dyn Store>` so the same code runs against
//! [`PgStore`](crate::PgStore) in production and
//! [`MemoryStore`](crate::MemoryStore) in tests.

use async_trait::async_trait;
use bugboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentFilter, CreateComment};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project, ProjectFilter};
use crate::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Generic CRUD over the tracker's entities.
///
/// `update_*` methods return `true` when a row with the given id existed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round-trip proving the backend is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    // -- Users --

    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<bool>;

    /// Add one to `notification_count` of every user except `except`, in a
    /// single batched write. Returns the number of users touched.
    async fn increment_notification_counts(&self, except: DbId) -> StoreResult<u64>;
    async fn reset_notification_count(&self, id: DbId) -> StoreResult<bool>;
    async fn increment_report_count(&self, id: DbId) -> StoreResult<bool>;
    async fn increment_fixed_count(&self, id: DbId) -> StoreResult<bool>;

    // -- Projects --

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>>;
    async fn find_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>>;
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project>;

    // -- Reports --

    async fn get_report(&self, id: DbId) -> StoreResult<Option<Report>>;
    async fn find_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<Report>>;
    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report>;
    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<bool>;

    // -- Comments --

    async fn get_comment(&self, id: DbId) -> StoreResult<Option<Comment>>;
    async fn find_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>>;
    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment>;

    // -- Notifications --

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification>;

    /// Every notification, newest first.
    async fn list_notifications(&self) -> StoreResult<Vec<Notification>>;
}
