use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::scheduler::NotificationScheduler;

/// Why a pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    TasksChanged,
    SettingsChanged,
    Manual,
}

/// Cloneable sender side of the driver's trigger channel.
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: mpsc::UnboundedSender<Trigger>,
}

impl TriggerHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Trigger>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns false once the driver has stopped.
    pub fn fire(&self, trigger: Trigger) -> bool {
        self.tx.send(trigger).is_ok()
    }
}

/// Scheduler driver handle.
/// - trigger をまとめて（debounce）1 回のパスにする
/// - `shutdown_tx` を drop するとドライバーが止まる
/// - `shutdown_and_join()` で終了を待てる
pub struct SchedulerDriver {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
    trigger: TriggerHandle,
}

impl SchedulerDriver {
    pub fn spawn(scheduler: Arc<NotificationScheduler>, debounce: Duration) -> Self {
        let (trigger, rx) = TriggerHandle::channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(drive(scheduler, debounce, rx, shutdown_rx));

        Self {
            shutdown_tx,
            join,
            trigger,
        }
    }

    pub fn trigger(&self) -> TriggerHandle {
        self.trigger.clone()
    }

    /// Requests a pass after the debounce window.
    pub fn fire(&self, trigger: Trigger) -> bool {
        self.trigger.fire(trigger)
    }

    /// Forwards every change seen on `changes` as `kind` until either side closes.
    pub fn forward<T>(&self, mut changes: watch::Receiver<T>, kind: Trigger) -> JoinHandle<()>
    where
        T: Send + Sync + 'static,
    {
        let trigger = self.trigger();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                if !trigger.fire(kind) {
                    break;
                }
            }
        })
    }

    /// Request shutdown. A pass already running finishes; a pending window is dropped.
    pub fn request_shutdown(&self) {
        // ignore send error: the driver may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

fn stopping(changed: Result<(), watch::error::RecvError>, shutdown_rx: &watch::Receiver<bool>) -> bool {
    changed.is_err() || *shutdown_rx.borrow()
}

async fn drive(
    scheduler: Arc<NotificationScheduler>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Trigger>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(debounce_ms = debounce.as_millis() as u64, "scheduler driver started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let first = tokio::select! {
            changed = shutdown_rx.changed() => {
                if stopping(changed, &shutdown_rx) {
                    break;
                }
                continue;
            }
            trigger = rx.recv() => match trigger {
                Some(trigger) => trigger,
                None => break,
            },
        };

        // trailing debounce: every trigger restarts the window
        let mut coalesced = 1usize;
        let window = sleep(debounce);
        tokio::pin!(window);
        loop {
            tokio::select! {
                _ = &mut window => break,
                trigger = rx.recv() => match trigger {
                    Some(_) => {
                        coalesced += 1;
                        window.as_mut().reset(Instant::now() + debounce);
                    }
                    // senders gone: still run the pass we owe
                    None => break,
                },
                changed = shutdown_rx.changed() => {
                    if stopping(changed, &shutdown_rx) {
                        info!("scheduler driver stopped");
                        return;
                    }
                }
            }
        }

        debug!(?first, coalesced, "running notification pass");
        // failures are logged and counted by the scheduler itself
        let _ = scheduler.run_pass().await;
    }
    info!("scheduler driver stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scheduler::PassOutcome;
    use crate::app::scheduler::tests::{harness, today};
    use crate::ports::{NotificationCenter, TaskStore};

    const DEBOUNCE: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn burst_of_triggers_runs_one_pass() {
        let h = harness(2, 64).await;
        let driver = SchedulerDriver::spawn(Arc::clone(&h.scheduler), DEBOUNCE);

        for _ in 0..5 {
            assert!(driver.fire(Trigger::TasksChanged));
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_secs(2)).await;

        let status = h.scheduler.status().await;
        assert_eq!(status.passes, 1);
        assert_eq!(
            status.last_outcome,
            Some(PassOutcome::Submitted { submitted: 2, failed: 0 })
        );
        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_run_separate_passes() {
        let h = harness(2, 64).await;
        let driver = SchedulerDriver::spawn(Arc::clone(&h.scheduler), DEBOUNCE);

        driver.fire(Trigger::Manual);
        sleep(Duration::from_secs(1)).await;
        driver.fire(Trigger::SettingsChanged);
        sleep(Duration::from_secs(1)).await;

        assert_eq!(h.scheduler.status().await.passes, 2);
        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_before_the_window_closes() {
        let h = harness(1, 64).await;
        let driver = SchedulerDriver::spawn(Arc::clone(&h.scheduler), DEBOUNCE);

        driver.fire(Trigger::Manual);
        sleep(Duration::from_millis(400)).await;
        assert_eq!(h.scheduler.status().await.passes, 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(h.scheduler.status().await.passes, 1);
        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn store_changes_are_forwarded() {
        let h = harness(2, 64).await;
        let driver = SchedulerDriver::spawn(Arc::clone(&h.scheduler), DEBOUNCE);
        let _forward = driver.forward(h.store.subscribe(), Trigger::TasksChanged);

        h.store.mark_done(h.first_task, today()).await.unwrap();
        sleep(Duration::from_secs(1)).await;

        assert_eq!(h.scheduler.status().await.passes, 1);
        assert_eq!(h.center.pending().await[0].id.as_str(), "tend.digest.2026-10-18");
        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_drops_a_pending_window() {
        let h = harness(1, 64).await;
        let driver = SchedulerDriver::spawn(Arc::clone(&h.scheduler), DEBOUNCE);
        let handle = driver.trigger();

        handle.fire(Trigger::Manual);
        sleep(Duration::from_millis(100)).await;
        driver.shutdown_and_join().await;

        assert_eq!(h.scheduler.status().await.passes, 0);
        assert!(!handle.fire(Trigger::Manual));
    }
}
