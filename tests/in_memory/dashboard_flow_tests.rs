//! End-to-end flows through the seeded accounts: sign-in, task
//! assignment, review, rating, and snapshot persistence.

use std::sync::Arc;

use chrono::{Duration, Utc};
use taskboard::audit::AuditLog;
use taskboard::executor::domain::TaskScores;
use taskboard::executor::ports::ExecutorRepository;
use taskboard::identity::domain::Role;
use taskboard::task::domain::{FileMeta, TaskStatus};
use taskboard::task::services::CreateTaskRequest;

use super::helpers::{App, assert_delivered};

fn report_file() -> FileMeta {
    FileMeta {
        name: "report.pdf".to_owned(),
        size: 2048,
        content_type: "application/pdf".to_owned(),
        last_modified: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn seeded_accounts_sign_in_with_their_roles() {
    let app = App::new();
    app.restore().await;

    let admin = app.sign_in("admin", "admin123").await;
    let manager = app.sign_in("manager", "manager123").await;
    let executor = app.sign_in("executor", "executor123").await;

    assert_eq!(admin.role(), Role::Admin);
    assert_eq!(manager.role(), Role::Manager);
    assert_eq!(executor.role(), Role::Executor);

    // Sign-in is visible to the account and recorded in the trail.
    assert_delivered(&app.sink, &executor, "Signed in").expect("sign-in notification");
    let trail = app.audit.recent().await.expect("audit trail");
    assert_eq!(
        trail.iter().filter(|e| e.action() == "Signed in").count(),
        3
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn full_task_cycle_updates_the_executor_record() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    let task = app
        .lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Redesign dashboard widgets",
                "Replace the legacy widget grid",
                Utc::now() + Duration::days(3),
                worker.id(),
            ),
        )
        .await
        .expect("create task");
    assert_eq!(task.status(), TaskStatus::InProgress);

    let record = app
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert!(!record.is_free());

    let reviewed = app
        .lifecycle
        .complete_with_report(&worker, task.id(), Some(report_file()))
        .await
        .expect("complete with report");
    assert_eq!(reviewed.status(), TaskStatus::UnderReview);
    assert!(reviewed.report().is_some());

    let freed = app
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert!(freed.is_free());

    let scores = TaskScores::new(5, 5, 5).expect("valid scores");
    let rated = app
        .lifecycle
        .rate_task(&manager, task.id(), scores)
        .await
        .expect("rate task");
    assert_eq!(rated.status(), TaskStatus::Completed);
    assert_eq!(rated.scores(), Some(scores));

    let finished = app
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert_eq!(finished.completed_tasks(), 1);
    assert_eq!(finished.rating().to_string(), "5.0");
    assert_eq!(finished.task_history().len(), 1);

    assert_delivered(&app.sink, &worker, "New task assigned").expect("assignment notification");
    assert_delivered(&app.sink, &worker, "Task rated").expect("rating notification");
}

#[tokio::test(flavor = "multi_thread")]
async fn state_survives_a_restart_through_the_shared_store() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    let task = app
        .lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Migrate the audit trail",
                "Move entries to the new record format",
                Utc::now() + Duration::days(7),
                worker.id(),
            ),
        )
        .await
        .expect("create task");
    app.snapshot
        .set_current_user(Some(manager.clone()))
        .await
        .expect("set session");
    app.snapshot.persist().await.expect("persist");

    let restarted = App::over_store(Arc::clone(&app.store));
    restarted.restore().await;

    let tasks = restarted.lifecycle.list_tasks().await.expect("list tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks.first().map(taskboard::task::domain::Task::id), Some(task.id()));

    let record = restarted
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert!(!record.is_free());

    let session = restarted
        .snapshot
        .current_user()
        .expect("session readable")
        .expect("session present");
    assert_eq!(session.id(), manager.id());

    let trail = restarted.audit.recent().await.expect("audit trail");
    assert!(trail.iter().any(|e| e.action() == "Task created"));
}
