//! Unit tests for the audit trail.

use crate::audit::{AUDIT_CAPACITY, AuditActor, AuditEntry, AuditLog, InMemoryAuditLog};
use crate::identity::domain::{Role, User, Username};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn log() -> InMemoryAuditLog {
    InMemoryAuditLog::new()
}

fn actor() -> User {
    User::new(
        Username::new("lead").expect("valid username"),
        "pw123",
        "Team Lead",
        Role::Manager,
        None,
        &DefaultClock,
    )
    .expect("valid user")
}

fn entry(action: &str) -> AuditEntry {
    AuditEntry::user_action(&actor(), action, "details", &DefaultClock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entries_come_back_newest_first(log: InMemoryAuditLog) {
    log.record(entry("first")).await.expect("record");
    log.record(entry("second")).await.expect("record");

    let entries = log.recent().await.expect("readable");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries.first().map(AuditEntry::action), Some("second"));
    assert_eq!(entries.get(1).map(AuditEntry::action), Some("first"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn capacity_evicts_the_oldest_entries(log: InMemoryAuditLog) {
    for index in 0..=AUDIT_CAPACITY {
        log.record(entry(&format!("action-{index}"))).await.expect("record");
    }

    let entries = log.recent().await.expect("readable");

    assert_eq!(entries.len(), AUDIT_CAPACITY);
    assert_eq!(
        entries.first().map(AuditEntry::action),
        Some(format!("action-{AUDIT_CAPACITY}").as_str())
    );
    assert!(!entries.iter().any(|e| e.action() == "action-0"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_all_truncates_to_capacity(log: InMemoryAuditLog) {
    let oversized: Vec<AuditEntry> = (0..AUDIT_CAPACITY + 10)
        .map(|index| entry(&format!("action-{index}")))
        .collect();

    log.replace_all(oversized).await.expect("replace");

    assert_eq!(log.recent().await.expect("readable").len(), AUDIT_CAPACITY);
}

#[rstest]
fn system_and_user_actors_render_distinctly() {
    let user_entry = entry("Signed in");
    let system_entry = AuditEntry::system_action("Deadline passed", "details", &DefaultClock);

    assert!(matches!(user_entry.actor(), AuditActor::User { .. }));
    assert_eq!(user_entry.actor().to_string(), "Team Lead");
    assert!(matches!(system_entry.actor(), AuditActor::System));
    assert_eq!(system_entry.actor().to_string(), "System");
}
