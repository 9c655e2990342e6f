//! PostgreSQL-backed [`Store`].

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use bugboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentFilter, CreateComment};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project, ProjectFilter};
use crate::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};
use crate::store::{Store, StoreResult};
use crate::DbPool;

/// Column lists shared across queries to avoid repetition.
const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, image, \
                            notification_count, report_count, fixed_count, created_at";
const PROJECT_COLUMNS: &str = "id, name, department, manager_id, member_ids, created_at";
const REPORT_COLUMNS: &str = "id, project_id, reporter_id, assignee_id, bug, details, status, \
                              severity, reproduce_steps, events, created_at, updated_at";
const COMMENT_COLUMNS: &str = "id, report_id, author_id, content, posted_at";
const NOTIFICATION_COLUMNS: &str = "id, created_at, text, project_id, report_id, notifier_id";

/// [`Store`] implementation over a `sqlx` Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    // -- Users --

    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE TRUE"
        ));
        if let Some(email) = &filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(ids) = &filter.ids {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }
        qb.push(" ORDER BY id");

        qb.build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                password_hash = COALESCE($4, password_hash),
                image = COALESCE($5, image)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.password_hash)
        .bind(&input.image)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_notification_counts(&self, except: DbId) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET notification_count = notification_count + 1 WHERE id <> $1",
        )
        .bind(except)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn reset_notification_count(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET notification_count = 0 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_report_count(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET report_count = report_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_fixed_count(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET fixed_count = fixed_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    // -- Projects --

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE TRUE"
        ));
        if let Some(name) = &filter.name {
            qb.push(" AND name = ").push_bind(name.clone());
        }
        qb.push(" ORDER BY id");

        qb.build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        let query = format!(
            "INSERT INTO projects (name, department, manager_id, member_ids)
             VALUES ($1, $2, $3, $4)
             RETURNING {PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.department)
            .bind(input.manager_id)
            .bind(&input.member_ids)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    // -- Reports --

    async fn get_report(&self, id: DbId) -> StoreResult<Option<Report>> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<Report>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE TRUE"
        ));
        if let Some(project_id) = filter.project_id {
            qb.push(" AND project_id = ").push_bind(project_id);
        }
        if let Some(reporter_id) = filter.reporter_id {
            qb.push(" AND reporter_id = ").push_bind(reporter_id);
        }
        if let Some(assignee_id) = filter.assignee_id {
            qb.push(" AND assignee_id = ").push_bind(assignee_id);
        }
        qb.push(" ORDER BY updated_at DESC, id DESC");

        qb.build_query_as::<Report>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report> {
        let query = format!(
            "INSERT INTO reports
                (project_id, reporter_id, bug, details, status, severity, reproduce_steps, events)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {REPORT_COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.project_id)
            .bind(input.reporter_id)
            .bind(&input.bug)
            .bind(&input.details)
            .bind(&input.status)
            .bind(&input.severity)
            .bind(&input.reproduce_steps)
            .bind(&input.events)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE reports SET
                status = COALESCE($2, status),
                assignee_id = COALESCE($3, assignee_id),
                events = COALESCE($4, events),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.status)
        .bind(input.assignee_id)
        .bind(&input.events)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    // -- Comments --

    async fn get_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE TRUE"
        ));
        if let Some(report_id) = filter.report_id {
            qb.push(" AND report_id = ").push_bind(report_id);
        }
        qb.push(" ORDER BY id DESC");

        qb.build_query_as::<Comment>()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        let query = format!(
            "INSERT INTO comments (report_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.report_id)
            .bind(input.author_id)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    // -- Notifications --

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        let query = format!(
            "INSERT INTO notifications (text, project_id, report_id, notifier_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(&input.text)
            .bind(input.project_id)
            .bind(input.report_id)
            .bind(input.notifier_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        let query = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }
}
