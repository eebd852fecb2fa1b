//! Shared wiring for the in-memory integration suite.

use std::sync::Arc;

use mockable::DefaultClock;
use taskboard::audit::InMemoryAuditLog;
use taskboard::executor::adapters::memory::InMemoryExecutorRepository;
use taskboard::identity::adapters::memory::InMemoryUserRepository;
use taskboard::identity::domain::User;
use taskboard::identity::services::AccountService;
use taskboard::monitor::DeadlineScanner;
use taskboard::notification::adapters::InMemoryNotificationSink;
use taskboard::notification::services::Notifier;
use taskboard::storage::{InMemoryStateStore, SnapshotService};
use taskboard::task::adapters::memory::InMemoryTaskRepository;
use taskboard::task::services::TaskLifecycleService;

/// Notifier wired against the in-memory sink.
pub type TestNotifier = Notifier<InMemoryNotificationSink, DefaultClock>;

/// Account service wired against the in-memory adapters.
pub type TestAccounts = AccountService<
    InMemoryUserRepository,
    InMemoryExecutorRepository,
    InMemoryTaskRepository,
    InMemoryNotificationSink,
    InMemoryAuditLog,
    DefaultClock,
>;

/// Lifecycle service wired against the in-memory adapters.
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryExecutorRepository,
    InMemoryNotificationSink,
    InMemoryAuditLog,
    DefaultClock,
>;

/// Deadline scanner wired against the in-memory adapters.
pub type TestScanner = DeadlineScanner<
    InMemoryTaskRepository,
    InMemoryExecutorRepository,
    InMemoryNotificationSink,
    InMemoryAuditLog,
    DefaultClock,
>;

/// Snapshot service wired against the in-memory state store.
pub type TestSnapshot = SnapshotService<
    InMemoryStateStore,
    InMemoryUserRepository,
    InMemoryExecutorRepository,
    InMemoryTaskRepository,
    InMemoryNotificationSink,
    InMemoryAuditLog,
    DefaultClock,
>;

/// A fully wired in-memory application.
pub struct App {
    /// Executor record repository.
    pub executors: Arc<InMemoryExecutorRepository>,
    /// Delivery sink capturing every published notification.
    pub sink: Arc<InMemoryNotificationSink>,
    /// Audit trail.
    pub audit: Arc<InMemoryAuditLog>,
    /// Authentication and account administration.
    pub accounts: TestAccounts,
    /// Task lifecycle orchestration.
    pub lifecycle: Arc<TestLifecycle>,
    /// Deadline scanner over the task set.
    pub scanner: Arc<TestScanner>,
    /// Backing state store for snapshots.
    pub store: Arc<InMemoryStateStore>,
    /// Snapshot mirroring between repositories and the store.
    pub snapshot: TestSnapshot,
}

impl App {
    /// Wires a fresh application over an empty state store.
    pub fn new() -> Self {
        Self::over_store(Arc::new(InMemoryStateStore::new()))
    }

    /// Wires a fresh application over an existing state store, as a
    /// process restart would.
    pub fn over_store(store: Arc<InMemoryStateStore>) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let executors = Arc::new(InMemoryExecutorRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let sink = Arc::new(InMemoryNotificationSink::new());
        let audit = Arc::new(InMemoryAuditLog::new());
        let clock = Arc::new(DefaultClock);
        let notifier = Arc::new(Notifier::new(Arc::clone(&sink), Arc::clone(&clock)));
        let accounts = AccountService::new(
            Arc::clone(&users),
            Arc::clone(&executors),
            Arc::clone(&tasks),
            Arc::clone(&notifier),
            Arc::clone(&audit),
            Arc::clone(&clock),
        );
        let lifecycle = Arc::new(TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&executors),
            Arc::clone(&notifier),
            Arc::clone(&audit),
            Arc::clone(&clock),
        ));
        let scanner = Arc::new(DeadlineScanner::new(
            Arc::clone(&tasks),
            Arc::clone(&lifecycle),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ));
        let snapshot = SnapshotService::new(
            Arc::clone(&store),
            Arc::clone(&users),
            Arc::clone(&executors),
            Arc::clone(&tasks),
            Arc::clone(&notifier),
            Arc::clone(&audit),
            Arc::clone(&clock),
        );
        Self {
            executors,
            sink,
            audit,
            accounts,
            lifecycle,
            scanner,
            store,
            snapshot,
        }
    }

    /// Restores state from the store, seeding defaults into an empty one.
    pub async fn restore(&self) {
        self.snapshot.restore().await.expect("snapshot restore");
    }

    /// Signs in with the given credentials.
    pub async fn sign_in(&self, username: &str, password: &str) -> User {
        self.accounts
            .authenticate(username, password)
            .await
            .expect("authentication")
    }
}

/// Asserts that a notification with the given title reached the viewer.
///
/// # Errors
///
/// Returns an error when the sink is unreadable or no matching
/// notification was delivered.
pub fn assert_delivered(
    sink: &InMemoryNotificationSink,
    viewer: &User,
    title: &str,
) -> Result<(), eyre::Report> {
    let delivered = sink.delivered_for(viewer)?;
    eyre::ensure!(
        delivered.iter().any(|n| n.title() == title),
        "no \"{title}\" notification delivered to {}",
        viewer.name()
    );
    Ok(())
}
