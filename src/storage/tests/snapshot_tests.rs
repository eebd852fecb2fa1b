//! Unit tests for snapshot restoration and persistence.

use std::sync::Arc;

use crate::audit::{AuditEntry, AuditLog, InMemoryAuditLog};
use crate::executor::adapters::memory::InMemoryExecutorRepository;
use crate::executor::ports::ExecutorRepository;
use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{Role, User},
    ports::UserRepository,
};
use crate::notification::adapters::InMemoryNotificationSink;
use crate::notification::services::Notifier;
use crate::storage::{InMemoryStateStore, SnapshotService, StateKey, StateStore};
use crate::task::adapters::memory::InMemoryTaskRepository;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestSnapshot = SnapshotService<
    InMemoryStateStore,
    InMemoryUserRepository,
    InMemoryExecutorRepository,
    InMemoryTaskRepository,
    InMemoryNotificationSink,
    InMemoryAuditLog,
    DefaultClock,
>;

struct Harness {
    snapshot: TestSnapshot,
    store: Arc<InMemoryStateStore>,
    users: Arc<InMemoryUserRepository>,
    executors: Arc<InMemoryExecutorRepository>,
    audit: Arc<InMemoryAuditLog>,
    clock: Arc<DefaultClock>,
}

fn harness_over(store: Arc<InMemoryStateStore>) -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let executors = Arc::new(InMemoryExecutorRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let sink = Arc::new(InMemoryNotificationSink::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let clock = Arc::new(DefaultClock);
    let notifier = Arc::new(Notifier::new(sink, Arc::clone(&clock)));
    let snapshot = SnapshotService::new(
        Arc::clone(&store),
        Arc::clone(&users),
        Arc::clone(&executors),
        tasks,
        notifier,
        Arc::clone(&audit),
        Arc::clone(&clock),
    );
    Harness {
        snapshot,
        store,
        users,
        executors,
        audit,
        clock,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_over(Arc::new(InMemoryStateStore::new()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_store_restores_the_canonical_seed(harness: Harness) {
    harness.snapshot.restore().await.expect("restore");

    let users = harness.users.list_all().await.expect("list users");
    assert_eq!(users.len(), 3);
    assert_eq!(
        users.iter().filter(|u| u.role() == Role::Admin).count(),
        1
    );
    assert!(users.first().expect("seed admin").username().is_reserved_admin());

    let executors = harness.executors.list_all().await.expect("list executors");
    assert_eq!(executors.len(), 1);
    let seed_executor = users
        .iter()
        .find(|u| u.role() == Role::Executor)
        .expect("seed executor account");
    assert_eq!(
        executors.first().map(|e| e.id()),
        Some(seed_executor.id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_record_degrades_to_the_seed(harness: Harness) {
    harness
        .store
        .write(StateKey::Users, "{not json")
        .await
        .expect("write corrupt record");

    harness.snapshot.restore().await.expect("restore");

    let users = harness.users.list_all().await.expect("list users");
    assert_eq!(users.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restore_repairs_a_demoted_admin(harness: Harness) {
    let mut admin = User::seed_admin(&*harness.clock);
    admin.set_role(Role::Executor);
    let payload = serde_json::to_string(&vec![admin]).expect("serialize");
    harness
        .store
        .write(StateKey::Users, &payload)
        .await
        .expect("write record");

    harness.snapshot.restore().await.expect("restore");

    let users = harness.users.list_all().await.expect("list users");
    assert_eq!(users.first().map(User::role), Some(Role::Admin));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persist_and_restore_round_trip(harness: Harness) {
    harness.snapshot.restore().await.expect("initial restore");
    harness
        .audit
        .record(AuditEntry::system_action(
            "Deadline passed",
            "details",
            &*harness.clock,
        ))
        .await
        .expect("record audit entry");
    harness.snapshot.persist().await.expect("persist");

    let replica = harness_over(Arc::clone(&harness.store));
    replica.snapshot.restore().await.expect("replica restore");

    let users = replica.users.list_all().await.expect("list users");
    assert_eq!(users.len(), 3);
    assert_eq!(
        replica.executors.list_all().await.expect("list executors").len(),
        1
    );
    let entries = replica.audit.recent().await.expect("audit readable");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().map(AuditEntry::action), Some("Deadline passed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_account_round_trips_with_role_correction(harness: Harness) {
    harness.snapshot.restore().await.expect("restore");
    let mut admin = User::seed_admin(&*harness.clock);
    admin.set_role(Role::Manager);
    harness
        .snapshot
        .set_current_user(Some(admin))
        .await
        .expect("set session");

    let replica = harness_over(Arc::clone(&harness.store));
    replica.snapshot.restore().await.expect("replica restore");

    let session = replica
        .snapshot
        .current_user()
        .expect("session readable")
        .expect("session present");
    assert_eq!(session.role(), Role::Admin);

    replica
        .snapshot
        .set_current_user(None)
        .await
        .expect("clear session");
    assert_eq!(
        replica
            .store
            .read(StateKey::CurrentUser)
            .await
            .expect("read session record"),
        None
    );
}
