//! Deadline monitoring through the public surface: forced expiry,
//! warning delivery, and the background loop.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use taskboard::audit::AuditLog;
use taskboard::executor::ports::ExecutorRepository;
use taskboard::monitor;
use taskboard::task::domain::TaskStatus;
use taskboard::task::services::CreateTaskRequest;

use super::helpers::{App, assert_delivered};

#[tokio::test(flavor = "multi_thread")]
async fn overdue_task_is_forced_into_review() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    let task = app
        .lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Overdue migration",
                "Should have shipped yesterday",
                Utc::now() - Duration::hours(1),
                worker.id(),
            ),
        )
        .await
        .expect("create task");

    let outcome = app.scanner.scan().await.expect("scan");
    assert_eq!(outcome.expired, 1);

    let forced = app.lifecycle.find_task(task.id()).await.expect("find task");
    assert_eq!(forced.status(), TaskStatus::UnderReview);
    let record = app
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert!(record.is_free());

    assert_delivered(&app.sink, &worker, "Deadline passed").expect("overdue notification");
    let trail = app.audit.recent().await.expect("audit trail");
    assert_eq!(
        trail
            .iter()
            .filter(|e| e.action() == "Deadline passed")
            .count(),
        1
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn approaching_deadline_warns_once_per_window() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    app.lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Imminent release",
                "Half an hour left",
                Utc::now() + Duration::minutes(30),
                worker.id(),
            ),
        )
        .await
        .expect("create task");

    let first = app.scanner.scan().await.expect("first scan");
    assert_eq!(first.expired, 0);
    assert_eq!(first.warned, 1);

    // A rescan inside the same ten-minute bucket stays quiet.
    let second = app.scanner.scan().await.expect("second scan");
    assert_eq!(second.warned, 0);

    let delivered = app.sink.delivered_for(&worker).expect("delivered");
    assert_eq!(
        delivered
            .iter()
            .filter(|n| n.title() == "Deadline approaching")
            .count(),
        1
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn far_future_deadlines_stay_quiet() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    app.lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Next quarter",
                "Nothing to warn about yet",
                Utc::now() + Duration::days(30),
                worker.id(),
            ),
        )
        .await
        .expect("create task");

    let outcome = app.scanner.scan().await.expect("scan");
    assert_eq!(outcome.expired, 0);
    assert_eq!(outcome.warned, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn background_loop_scans_on_startup_and_shuts_down() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;
    let worker = app.sign_in("executor", "executor123").await;

    let task = app
        .lifecycle
        .create_task(
            &manager,
            CreateTaskRequest::new(
                "Missed window",
                "Expired before the monitor started",
                Utc::now() - Duration::minutes(5),
                worker.id(),
            ),
        )
        .await
        .expect("create task");

    let handle = monitor::spawn_with_period(Arc::clone(&app.scanner), StdDuration::from_secs(600));
    handle.request_rescan();
    tokio::time::sleep(StdDuration::from_millis(200)).await;
    handle.shutdown().await;

    let forced = app.lifecycle.find_task(task.id()).await.expect("find task");
    assert_eq!(forced.status(), TaskStatus::UnderReview);
}
