//! Account administration flows: creation, role changes, deletion, and
//! the guards that keep assigned executors intact.

use chrono::{Duration, Utc};
use taskboard::executor::ports::ExecutorRepository;
use taskboard::identity::domain::Role;
use taskboard::identity::services::{AccessError, CreateUserRequest};
use taskboard::task::services::CreateTaskRequest;

use super::helpers::App;

#[tokio::test(flavor = "multi_thread")]
async fn admin_creates_managers_and_managers_only_create_executors() {
    let app = App::new();
    app.restore().await;
    let admin = app.sign_in("admin", "admin123").await;

    let lead = app
        .accounts
        .create_user(
            &admin,
            CreateUserRequest::new("lead", "lead123", "Team Lead", Role::Manager),
        )
        .await
        .expect("create manager");
    assert_eq!(lead.role(), Role::Manager);

    // A manager requesting a manager still gets an executor.
    let hire = app
        .accounts
        .create_user(
            &lead,
            CreateUserRequest::new("hire", "hire123", "New Hire", Role::Manager)
                .with_specialization("Backend developer"),
        )
        .await
        .expect("create executor");
    assert_eq!(hire.role(), Role::Executor);
    assert!(
        app.executors
            .find_by_id(hire.id())
            .await
            .expect("lookup")
            .is_some()
    );

    // Executors administer nothing.
    let worker = app.sign_in("executor", "executor123").await;
    let denied = app
        .accounts
        .create_user(
            &worker,
            CreateUserRequest::new("rogue", "rogue123", "Rogue", Role::Executor),
        )
        .await;
    assert!(matches!(denied, Err(AccessError::PermissionDenied)));

    // Logins are unique.
    let taken = app
        .accounts
        .create_user(
            &admin,
            CreateUserRequest::new("lead", "other123", "Other Lead", Role::Manager),
        )
        .await;
    assert!(matches!(taken, Err(AccessError::UsernameTaken(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn assigned_executor_cannot_be_deleted_until_its_tasks_are_gone() {
    let app = App::new();
    app.restore().await;
    let admin = app.sign_in("admin", "admin123").await;
    let worker = app.sign_in("executor", "executor123").await;

    let task = app
        .lifecycle
        .create_task(
            &admin,
            CreateTaskRequest::new(
                "Quarterly cleanup",
                "Archive stale records",
                Utc::now() + Duration::days(2),
                worker.id(),
            ),
        )
        .await
        .expect("create task");

    let blocked = app.accounts.delete_user(&admin, worker.id()).await;
    assert!(matches!(blocked, Err(AccessError::ExecutorAssigned(id)) if id == worker.id()));

    app.lifecycle
        .delete_tasks(&admin, &[task.id()])
        .await
        .expect("delete tasks");
    app.accounts
        .delete_user(&admin, worker.id())
        .await
        .expect("delete user");
    assert!(
        app.executors
            .find_by_id(worker.id())
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn role_changes_keep_the_executor_records_in_step() {
    let app = App::new();
    app.restore().await;
    let admin = app.sign_in("admin", "admin123").await;
    let worker = app.sign_in("executor", "executor123").await;

    // Promotion drops the executor record.
    app.accounts
        .change_role(&admin, worker.id(), Role::Manager)
        .await
        .expect("promote");
    assert!(
        app.executors
            .find_by_id(worker.id())
            .await
            .expect("lookup")
            .is_none()
    );

    // Demotion back recreates a fresh record.
    app.accounts
        .change_role(&admin, worker.id(), Role::Executor)
        .await
        .expect("demote");
    let record = app
        .executors
        .find_by_id(worker.id())
        .await
        .expect("lookup")
        .expect("executor record");
    assert!(record.is_free());
    assert_eq!(record.completed_tasks(), 0);

    // The admin role is never grantable.
    let denied = app
        .accounts
        .change_role(&admin, worker.id(), Role::Admin)
        .await;
    assert!(matches!(denied, Err(AccessError::PermissionDenied)));
}

#[tokio::test(flavor = "multi_thread")]
async fn password_changes_take_effect_at_the_next_sign_in() {
    let app = App::new();
    app.restore().await;
    let manager = app.sign_in("manager", "manager123").await;

    let wrong_old = app
        .accounts
        .change_password(&manager, manager.id(), "nope", "fresh123")
        .await;
    assert!(matches!(wrong_old, Err(AccessError::InvalidCredentials)));

    app.accounts
        .change_password(&manager, manager.id(), "manager123", "fresh123")
        .await
        .expect("change password");

    let stale = app.accounts.authenticate("manager", "manager123").await;
    assert!(matches!(stale, Err(AccessError::InvalidCredentials)));
    let renewed = app.sign_in("manager", "fresh123").await;
    assert_eq!(renewed.id(), manager.id());
}
