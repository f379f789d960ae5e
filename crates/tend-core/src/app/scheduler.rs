//! NotificationScheduler - 保留中の通知を「全部消して、全部出し直す」
//!
//! # 1 回のパス
//! 1. 通知の許可を確認（なければ何もしない）
//! 2. 設定を読む（無効なら cancel_all して終了）
//! 3. ストアからタスク行を取得（失敗したら cancel 前に中断し、既存の通知は残す）
//! 4. ダイジェストを組み立て、`max_pending` 件に切り詰める
//! 5. cancel_all
//! 6. 設定を読み直す（この間に無効化されていたら submit しない）
//! 7. submit（1 件ずつの失敗はログに残して続行）
//!
//! パスは同時に 1 本しか走りません（pass lock）。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::status::SchedulerStatus;
use crate::domain::digest::ReminderDigestBuilder;
use crate::ports::{Clock, DeliveryError, NotificationCenter, PreferenceStore, StoreError, TaskStore};

/// PassOutcome は 1 回のパスの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    /// Notification permission not granted; nothing touched.
    Unauthorized,
    /// Notifications are off; pending requests were cancelled.
    Disabled,
    /// Turned off between cancel and submit; nothing submitted.
    AbortedDisabled,
    Submitted { submitted: usize, failed: usize },
}

/// SchedulerError はパスを中断したエラー（プロセスには致命的でない）
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to fetch tasks: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to cancel pending notifications: {0}")]
    Cancel(#[source] DeliveryError),
}

pub struct NotificationScheduler {
    store: Arc<dyn TaskStore>,
    center: Arc<dyn NotificationCenter>,
    prefs: Arc<dyn PreferenceStore>,
    clock: Arc<dyn Clock>,
    title: String,
    max_pending: usize,
    pass_lock: Mutex<()>,
    status: Mutex<SchedulerStatus>,
}

impl NotificationScheduler {
    pub(crate) fn new(
        store: Arc<dyn TaskStore>,
        center: Arc<dyn NotificationCenter>,
        prefs: Arc<dyn PreferenceStore>,
        clock: Arc<dyn Clock>,
        title: String,
        max_pending: usize,
    ) -> Self {
        Self {
            store,
            center,
            prefs,
            clock,
            title,
            max_pending,
            pass_lock: Mutex::new(()),
            status: Mutex::new(SchedulerStatus::default()),
        }
    }

    /// Runs one replace-all pass; waits for a pass already in flight.
    pub async fn run_pass(&self) -> Result<PassOutcome, SchedulerError> {
        let _pass = self.pass_lock.lock().await;
        let result = self.pass().await;

        let mut status = self.status.lock().await;
        match &result {
            Ok(outcome) => status.record(outcome),
            Err(err) => {
                warn!(error = %err, "notification pass failed");
                status.record_failure();
            }
        }
        result
    }

    pub async fn status(&self) -> SchedulerStatus {
        self.status.lock().await.clone()
    }

    async fn pass(&self) -> Result<PassOutcome, SchedulerError> {
        if !self.center.is_authorized().await {
            if let Err(error) = self.center.cancel_all().await {
                warn!(%error, "could not clear requests while unauthorized");
            }
            debug!("notifications not authorized; no digest built");
            return Ok(PassOutcome::Unauthorized);
        }

        let settings = self.prefs.notification_settings().await;
        if !settings.enabled {
            self.center.cancel_all().await.map_err(SchedulerError::Cancel)?;
            debug!("notifications disabled; pending requests cancelled");
            return Ok(PassOutcome::Disabled);
        }

        let today = self.clock.today();
        let rows = self
            .store
            .fetch_due_tasks(today)
            .await
            .map_err(SchedulerError::Fetch)?;

        let mut requests = ReminderDigestBuilder::new(settings.digest_time)
            .with_title(self.title.as_str())
            .build(&rows, today);
        if requests.len() > self.max_pending {
            debug!(
                built = requests.len(),
                max_pending = self.max_pending,
                "dropping the latest digests"
            );
            requests.truncate(self.max_pending);
        }

        self.center.cancel_all().await.map_err(SchedulerError::Cancel)?;

        if !self.prefs.notification_settings().await.enabled {
            info!("notifications disabled mid-pass; submission aborted");
            return Ok(PassOutcome::AbortedDisabled);
        }

        let total = requests.len();
        let failures = self.center.submit(requests).await;
        for failure in &failures {
            warn!(id = %failure.id, error = %failure.error, "notification request failed");
        }

        let submitted = total.saturating_sub(failures.len());
        let outcome = PassOutcome::Submitted {
            submitted,
            failed: failures.len(),
        };
        info!(
            %today,
            rows = rows.len(),
            submitted,
            failed = failures.len(),
            "notification pass finished"
        );
        Ok(outcome)
    }
}
