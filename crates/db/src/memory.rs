//! In-process [`Store`] used by tests and by local runs without a database.
//!
//! Mirrors the Postgres schema's behaviour where callers can observe it:
//! sequential ids, unique email and project name, default column values and
//! result ordering.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use bugboard_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::{Comment, CommentFilter, CreateComment};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project, ProjectFilter};
use crate::models::report::{CreateReport, Report, ReportFilter, UpdateReport};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter, DEFAULT_IMAGE};
use crate::store::{Store, StoreResult};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    projects: BTreeMap<DbId, Project>,
    reports: BTreeMap<DbId, Report>,
    comments: BTreeMap<DbId, Comment>,
    notifications: BTreeMap<DbId, Notification>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// [`Store`] implementation holding every table in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    // -- Users --

    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| filter.email.as_ref().is_none_or(|email| &u.email == email))
            .filter(|u| filter.ids.as_ref().is_none_or(|ids| ids.contains(&u.id)))
            .cloned()
            .collect())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation("uq_users_email".into()));
        }
        let user = User {
            id: tables.allocate_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            image: DEFAULT_IMAGE.to_string(),
            notification_count: 0,
            report_count: 0,
            fixed_count: 0,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: DbId, input: &UpdateUser) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(first_name) = &input.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &input.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(password_hash) = &input.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(image) = &input.image {
            user.image = image.clone();
        }
        Ok(true)
    }

    async fn increment_notification_counts(&self, except: DbId) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut touched = 0;
        for user in tables.users.values_mut().filter(|u| u.id != except) {
            user.notification_count += 1;
            touched += 1;
        }
        Ok(touched)
    }

    async fn reset_notification_count(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(&id)
            .map(|u| u.notification_count = 0)
            .is_some())
    }

    async fn increment_report_count(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(&id)
            .map(|u| u.report_count += 1)
            .is_some())
    }

    async fn increment_fixed_count(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .users
            .get_mut(&id)
            .map(|u| u.fixed_count += 1)
            .is_some())
    }

    // -- Projects --

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn find_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .values()
            .filter(|p| filter.name.as_ref().is_none_or(|name| &p.name == name))
            .cloned()
            .collect())
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        if tables.projects.values().any(|p| p.name == input.name) {
            return Err(StoreError::UniqueViolation("uq_projects_name".into()));
        }
        let project = Project {
            id: tables.allocate_id(),
            name: input.name.clone(),
            department: input.department.clone(),
            manager_id: input.manager_id,
            member_ids: input.member_ids.clone(),
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    // -- Reports --

    async fn get_report(&self, id: DbId) -> StoreResult<Option<Report>> {
        Ok(self.tables.read().await.reports.get(&id).cloned())
    }

    async fn find_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<Report>> {
        let tables = self.tables.read().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|r| filter.project_id.is_none_or(|id| r.project_id == id))
            .filter(|r| filter.reporter_id.is_none_or(|id| r.reporter_id == id))
            .filter(|r| filter.assignee_id.is_none_or(|id| r.assignee_id == Some(id)))
            .cloned()
            .collect();
        reports.sort_by_key(|r| Reverse((r.updated_at, r.id)));
        Ok(reports)
    }

    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let report = Report {
            id: tables.allocate_id(),
            project_id: input.project_id,
            reporter_id: input.reporter_id,
            assignee_id: None,
            bug: input.bug.clone(),
            details: input.details.clone(),
            status: input.status.clone(),
            severity: input.severity.clone(),
            reproduce_steps: input.reproduce_steps.clone(),
            events: Some(input.events.clone()),
            created_at: now,
            updated_at: now,
        };
        tables.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(report) = tables.reports.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(status) = &input.status {
            report.status = status.clone();
        }
        if let Some(assignee_id) = input.assignee_id {
            report.assignee_id = Some(assignee_id);
        }
        if let Some(events) = &input.events {
            report.events = Some(events.clone());
        }
        report.updated_at = Utc::now();
        Ok(true)
    }

    // -- Comments --

    async fn get_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn find_comments(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .rev()
            .filter(|c| filter.report_id.is_none_or(|id| c.report_id == id))
            .cloned()
            .collect())
    }

    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let comment = Comment {
            id: tables.allocate_id(),
            report_id: input.report_id,
            author_id: input.author_id,
            content: input.content.clone(),
            posted_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    // -- Notifications --

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        let mut tables = self.tables.write().await;
        let notification = Notification {
            id: tables.allocate_id(),
            created_at: Utc::now(),
            text: input.text.clone(),
            project_id: input.project_id,
            report_id: input.report_id,
            notifier_id: input.notifier_id,
        };
        tables
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_notifications(&self) -> StoreResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        let mut notifications: Vec<Notification> = tables.notifications.values().cloned().collect();
        notifications.sort_by_key(|n| Reverse((n.created_at, n.id)));
        Ok(notifications)
    }
}
