//! Feed texts for notifications.
//!
//! These mirror the report timeline templates in [`crate::report_log`] but
//! are phrased for a third-person feed that spans every project.

use crate::report::ReportStatus;

/// What happened, from the feed's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    NewReport,
    NewComment,
    StatusUpdate(ReportStatus),
    /// Carries the assignee's display name.
    NewAssignment(String),
}

impl NotificationKind {
    /// Render the feed line. Always starts with the actor's display name.
    pub fn render(&self, actor: &str, project: &str) -> String {
        match self {
            NotificationKind::NewReport => {
                format!("{actor} reported an issue on project {project}")
            }
            NotificationKind::NewComment => {
                format!("{actor} commented on a report about project {project}")
            }
            NotificationKind::StatusUpdate(status) => {
                format!("{actor} moved a report on project {project} to {status}")
            }
            NotificationKind::NewAssignment(assignee) => {
                format!("{actor} assigned {assignee} to a report on project {project}")
            }
        }
    }
}
