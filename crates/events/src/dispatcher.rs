//! Notification fan-out.
//!
//! Every domain action funnels through [`NotificationDispatcher::notify`],
//! which writes the notification, bumps every other user's unread counter
//! and publishes a [`LiveEvent`]. The three steps are not atomic: a failure
//! after the insert leaves the notification stored with counters untouched.

use std::sync::Arc;

use bugboard_core::error::CoreError;
use bugboard_core::notification_text::NotificationKind;
use bugboard_core::types::DbId;
use bugboard_db::models::notification::{CreateNotification, Notification};
use bugboard_db::Store;

use crate::broker::Topic;
use crate::error::EventsResult;
use crate::live::{LiveBroker, LiveEvent, ReportRef};

/// What to notify about.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub kind: NotificationKind,
    pub project_id: DbId,
    pub report_id: Option<DbId>,
}

/// Broker topic a notification of `kind` is published on.
pub fn topic_for(kind: &NotificationKind) -> Topic {
    match kind {
        NotificationKind::NewReport => Topic::NewReport,
        NotificationKind::NewComment => Topic::NewComment,
        NotificationKind::StatusUpdate(_) => Topic::ReportStatusUpdate,
        NotificationKind::NewAssignment(_) => Topic::NewAssignment,
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn Store>,
    broker: Arc<LiveBroker>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn Store>, broker: Arc<LiveBroker>) -> Self {
        Self { store, broker }
    }

    /// Record and broadcast a notification raised by `actor_id`.
    ///
    /// Returns the rendered text.
    pub async fn notify(&self, actor_id: DbId, request: NotificationRequest) -> EventsResult<String> {
        let project = self
            .store
            .get_project(request.project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "project",
                id: request.project_id,
            })?;
        let actor = self
            .store
            .get_user(actor_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: actor_id,
            })?;

        let author = actor.display_name();
        let text = request.kind.render(&author, &project.name);

        self.store
            .create_notification(&CreateNotification {
                text: text.clone(),
                project_id: project.id,
                report_id: request.report_id,
                notifier_id: actor.id,
            })
            .await?;

        let bumped = self.store.increment_notification_counts(actor.id).await?;

        let topic = topic_for(&request.kind);
        let delivered = self.broker.publish(
            topic,
            LiveEvent {
                topic,
                notifier: actor.id,
                author,
                project: project.name,
                report: request.report_id.map(|id| ReportRef { id }),
                notification: text.clone(),
            },
        );

        tracing::info!(
            actor_id = actor.id,
            project_id = project.id,
            report_id = ?request.report_id,
            %topic,
            bumped,
            delivered,
            "Notification dispatched"
        );

        Ok(text)
    }

    /// Every notification, newest first.
    pub async fn list_notifications(&self) -> EventsResult<Vec<Notification>> {
        Ok(self.store.list_notifications().await?)
    }

    /// Unread notifications of `user_id` since their last reset.
    pub async fn unread_count(&self, user_id: DbId) -> EventsResult<i32> {
        let user = self.store.get_user(user_id).await?.ok_or(CoreError::NotFound {
            entity: "user",
            id: user_id,
        })?;
        Ok(user.notification_count)
    }

    /// Reset the unread counter of `user_id` to zero.
    pub async fn mark_read(&self, user_id: DbId) -> EventsResult<()> {
        if !self.store.reset_notification_count(user_id).await? {
            return Err(CoreError::NotFound {
                entity: "user",
                id: user_id,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bugboard_core::report::ReportStatus;
    use bugboard_db::models::project::CreateProject;
    use bugboard_db::models::user::CreateUser;
    use bugboard_db::MemoryStore;

    use super::*;
    use crate::error::EventsError;

    struct Fixture {
        store: Arc<dyn Store>,
        broker: Arc<LiveBroker>,
        dispatcher: NotificationDispatcher,
        users: Vec<DbId>,
        project_id: DbId,
    }

    async fn fixture(user_count: usize) -> Fixture {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let broker = Arc::new(LiveBroker::default());
        let dispatcher = NotificationDispatcher::new(store.clone(), broker.clone());

        let mut users = Vec::new();
        for n in 0..user_count {
            let user = store
                .create_user(&CreateUser {
                    first_name: format!("User{n}"),
                    last_name: "Test".into(),
                    email: format!("user{n}@test.com"),
                    password_hash: "hash".into(),
                })
                .await
                .unwrap();
            users.push(user.id);
        }
        let project = store
            .create_project(&CreateProject {
                name: "Apollo".into(),
                department: "general".into(),
                manager_id: None,
                member_ids: users.clone(),
            })
            .await
            .unwrap();

        Fixture {
            store,
            broker,
            dispatcher,
            users,
            project_id: project.id,
        }
    }

    fn request(f: &Fixture, kind: NotificationKind) -> NotificationRequest {
        NotificationRequest {
            kind,
            project_id: f.project_id,
            report_id: Some(5),
        }
    }

    #[tokio::test]
    async fn unread_count_tracks_foreign_notifications() {
        let f = fixture(3).await;
        let (me, other) = (f.users[0], f.users[1]);

        for _ in 0..3 {
            f.dispatcher
                .notify(other, request(&f, NotificationKind::NewComment))
                .await
                .unwrap();
        }
        assert_eq!(f.dispatcher.unread_count(me).await.unwrap(), 3);

        f.dispatcher
            .notify(me, request(&f, NotificationKind::NewReport))
            .await
            .unwrap();
        assert_eq!(f.dispatcher.unread_count(me).await.unwrap(), 3);
        assert_eq!(f.dispatcher.unread_count(other).await.unwrap(), 1);
        assert_eq!(f.dispatcher.unread_count(f.users[2]).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn notify_stores_rendered_text() {
        let f = fixture(2).await;

        let text = f
            .dispatcher
            .notify(
                f.users[0],
                request(&f, NotificationKind::StatusUpdate(ReportStatus::Closed)),
            )
            .await
            .unwrap();

        assert_eq!(text, "User0 Test moved a report on project Apollo to CLOSED");
        let stored = f.dispatcher.list_notifications().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, text);
        assert_eq!(stored[0].notifier_id, f.users[0]);
        assert_eq!(stored[0].report_id, Some(5));
    }

    #[tokio::test]
    async fn subscribers_receive_live_event_on_kind_topic() {
        let f = fixture(2).await;
        let mut sub = f.broker.subscribe(&[Topic::NewAssignment]);

        f.dispatcher
            .notify(
                f.users[0],
                request(&f, NotificationKind::NewAssignment("User1 Test".into())),
            )
            .await
            .unwrap();

        let event = sub.recv().await.unwrap();
        assert_eq!(event.topic, Topic::NewAssignment);
        assert_eq!(event.notifier, f.users[0]);
        assert_eq!(event.author, "User0 Test");
        assert_eq!(event.project, "Apollo");
        assert_eq!(event.report_id(), Some(5));
        assert_eq!(
            event.notification,
            "User0 Test assigned User1 Test to a report on project Apollo"
        );
    }

    #[tokio::test]
    async fn notify_without_subscribers_still_persists() {
        let f = fixture(2).await;
        assert_eq!(f.broker.subscriber_count(Topic::NewReport), 0);

        f.dispatcher
            .notify(f.users[0], request(&f, NotificationKind::NewReport))
            .await
            .unwrap();

        assert_eq!(f.store.list_notifications().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_project_or_actor_is_not_found() {
        let f = fixture(1).await;

        let missing_project = f
            .dispatcher
            .notify(
                f.users[0],
                NotificationRequest {
                    kind: NotificationKind::NewReport,
                    project_id: 999,
                    report_id: None,
                },
            )
            .await;
        assert_matches!(
            missing_project,
            Err(EventsError::Core(CoreError::NotFound { entity: "project", .. }))
        );

        let missing_actor = f
            .dispatcher
            .notify(999, request(&f, NotificationKind::NewReport))
            .await;
        assert_matches!(
            missing_actor,
            Err(EventsError::Core(CoreError::NotFound { entity: "user", id: 999 }))
        );
        assert!(f.store.list_notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_read_resets_counter() {
        let f = fixture(2).await;
        f.dispatcher
            .notify(f.users[1], request(&f, NotificationKind::NewComment))
            .await
            .unwrap();
        assert_eq!(f.dispatcher.unread_count(f.users[0]).await.unwrap(), 1);

        f.dispatcher.mark_read(f.users[0]).await.unwrap();

        assert_eq!(f.dispatcher.unread_count(f.users[0]).await.unwrap(), 0);
        assert_matches!(
            f.dispatcher.mark_read(999).await,
            Err(EventsError::Core(CoreError::NotFound { .. }))
        );
    }
}
