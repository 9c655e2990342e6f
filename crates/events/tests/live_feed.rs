//! End-to-end: dispatcher publications reaching filtered subscriptions.

use std::sync::Arc;
use std::time::Duration;

use bugboard_core::notification_text::NotificationKind;
use bugboard_db::models::project::CreateProject;
use bugboard_db::models::user::CreateUser;
use bugboard_db::{MemoryStore, Store};
use bugboard_events::{LiveBroker, NotificationDispatcher, NotificationRequest, Topic};
use futures::StreamExt;

async fn setup() -> (Arc<LiveBroker>, NotificationDispatcher, i64, i64) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let broker = Arc::new(LiveBroker::default());
    let dispatcher = NotificationDispatcher::new(store.clone(), broker.clone());

    let user = store
        .create_user(&CreateUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@test.com".into(),
            password_hash: "hash".into(),
        })
        .await
        .unwrap();
    let project = store
        .create_project(&CreateProject {
            name: "Apollo".into(),
            department: "general".into(),
            manager_id: None,
            member_ids: vec![user.id],
        })
        .await
        .unwrap();

    (broker, dispatcher, user.id, project.id)
}

#[tokio::test]
async fn comment_feed_only_sees_its_report() {
    let (broker, dispatcher, user_id, project_id) = setup().await;
    let mut feed = broker.subscribe_filtered(&[Topic::NewComment], |e| e.report_id() == Some(5));

    for report_id in [7, 5] {
        dispatcher
            .notify(
                user_id,
                NotificationRequest {
                    kind: NotificationKind::NewComment,
                    project_id,
                    report_id: Some(report_id),
                },
            )
            .await
            .unwrap();
    }

    let event = feed.next().await.unwrap();
    assert_eq!(event.report_id(), Some(5));
    assert_eq!(event.notification, "Ann Lee commented on a report about project Apollo");

    let nothing_else = tokio::time::timeout(Duration::from_millis(50), feed.next()).await;
    assert!(nothing_else.is_err());
}

#[tokio::test]
async fn notification_feed_spans_all_kinds() {
    let (broker, dispatcher, user_id, project_id) = setup().await;
    let mut feed = broker.subscribe(&Topic::ALL_NOTIFICATIONS);

    for kind in [NotificationKind::NewReport, NotificationKind::NewComment] {
        dispatcher
            .notify(
                user_id,
                NotificationRequest {
                    kind,
                    project_id,
                    report_id: Some(1),
                },
            )
            .await
            .unwrap();
    }

    let first = feed.next().await.unwrap();
    let second = feed.next().await.unwrap();
    assert_eq!(first.topic, Topic::NewReport);
    assert_eq!(first.author, "Ann Lee");
    assert_eq!(first.project, "Apollo");
    assert_eq!(second.topic, Topic::NewComment);
}

#[tokio::test]
async fn late_subscriber_sees_no_history() {
    let (broker, dispatcher, user_id, project_id) = setup().await;
    dispatcher
        .notify(
            user_id,
            NotificationRequest {
                kind: NotificationKind::NewReport,
                project_id,
                report_id: None,
            },
        )
        .await
        .unwrap();

    let mut feed = broker.subscribe(&[Topic::NewReport]);
    let nothing = tokio::time::timeout(Duration::from_millis(50), feed.next()).await;
    assert!(nothing.is_err());
}
