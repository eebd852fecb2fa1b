//! Background loop driving the deadline scanner.

use crate::audit::AuditLog;
use crate::executor::ports::ExecutorRepository;
use crate::monitor::scan::DeadlineScanner;
use crate::notification::ports::NotificationSink;
use crate::task::ports::TaskRepository;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

/// Default scan period.
pub const DEFAULT_SCAN_PERIOD: Duration = Duration::from_secs(600);

/// Handle to a running deadline monitor.
///
/// Dropping the handle without calling [`MonitorHandle::shutdown`] leaves
/// the loop running until the runtime itself is torn down.
pub struct MonitorHandle {
    rescan: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Requests an immediate out-of-band scan.
    ///
    /// Called after any task-set mutation so warnings follow a change
    /// without waiting for the next tick.
    pub fn request_rescan(&self) {
        self.rescan.notify_one();
    }

    /// Stops the loop and waits for it to finish.
    pub async fn shutdown(self) {
        // A send error means the loop already exited; joining still
        // surfaces a panicked task.
        drop(self.shutdown.send(true));
        if let Err(err) = self.join.await {
            tracing::warn!(error = %err, "deadline monitor task failed to join");
        }
    }
}

/// Spawns the deadline monitor loop with the default period.
pub fn spawn<T, E, S, L, C>(scanner: Arc<DeadlineScanner<T, E, S, L, C>>) -> MonitorHandle
where
    T: TaskRepository + 'static,
    E: ExecutorRepository + 'static,
    S: NotificationSink + 'static,
    L: AuditLog + 'static,
    C: Clock + Send + Sync + 'static,
{
    spawn_with_period(scanner, DEFAULT_SCAN_PERIOD)
}

/// Spawns the deadline monitor loop.
///
/// The first scan runs immediately; subsequent scans follow the period or
/// an explicit [`MonitorHandle::request_rescan`]. Each pass also prunes
/// the notification dedup window. Scan failures are logged and the loop
/// keeps running.
pub fn spawn_with_period<T, E, S, L, C>(
    scanner: Arc<DeadlineScanner<T, E, S, L, C>>,
    period: Duration,
) -> MonitorHandle
where
    T: TaskRepository + 'static,
    E: ExecutorRepository + 'static,
    S: NotificationSink + 'static,
    L: AuditLog + 'static,
    C: Clock + Send + Sync + 'static,
{
    let rescan = Arc::new(Notify::new());
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let loop_rescan = Arc::clone(&rescan);

    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        tracing::debug!(period_secs = period.as_secs(), "deadline monitor started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = loop_rescan.notified() => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }
            match scanner.scan().await {
                Ok(outcome) => {
                    if outcome.expired > 0 || outcome.warned > 0 {
                        tracing::debug!(
                            expired = outcome.expired,
                            warned = outcome.warned,
                            "deadline scan finished"
                        );
                    }
                }
                Err(err) => tracing::warn!(error = %err, "deadline scan failed"),
            }
            if let Err(err) = scanner.prune_window() {
                tracing::warn!(error = %err, "dedup window prune failed");
            }
        }
        tracing::debug!("deadline monitor stopped");
    });

    MonitorHandle {
        rescan,
        shutdown: shutdown_tx,
        join,
    }
}
