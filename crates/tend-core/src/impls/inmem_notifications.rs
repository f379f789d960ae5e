//! InMemoryNotificationCenter - 開発用の通知センター
//!
//! # 実装詳細
//! - `BTreeMap<NotificationId, Notification>` で保留中の通知を管理（同じ ID は上書き）
//! - 許可フラグと、ID 単位の拒否リストで OS 側の失敗を再現できる

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::notification::{Notification, NotificationId};
use crate::ports::{DeliveryError, NotificationCenter, SubmitFailure};

/// InMemoryNotificationCenter は保留中の通知をメモリに持つ
///
/// # 使用例
/// ```ignore
/// let center = InMemoryNotificationCenter::new();
/// center.submit(notifications).await;
/// assert_eq!(center.pending().await.len(), 2);
/// ```
pub struct InMemoryNotificationCenter {
    pending: Mutex<BTreeMap<NotificationId, Notification>>,
    rejected: Mutex<BTreeSet<NotificationId>>,
    authorized: AtomicBool,
    cancel_calls: AtomicUsize,
}

impl InMemoryNotificationCenter {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(BTreeMap::new()),
            rejected: Mutex::new(BTreeSet::new()),
            authorized: AtomicBool::new(true),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    /// Makes every later submission of `id` fail.
    pub async fn reject(&self, id: NotificationId) {
        self.rejected.lock().await.insert(id);
    }

    /// Number of `cancel_all` calls so far.
    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryNotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    async fn submit(&self, requests: Vec<Notification>) -> Vec<SubmitFailure> {
        let rejected = self.rejected.lock().await.clone();
        let mut pending = self.pending.lock().await;
        let mut failures = Vec::new();
        for request in requests {
            if rejected.contains(&request.id) {
                failures.push(SubmitFailure {
                    error: DeliveryError::Rejected(format!("{} is blocked", request.id)),
                    id: request.id,
                });
                continue;
            }
            pending.insert(request.id.clone(), request);
        }
        failures
    }

    async fn cancel_all(&self) -> Result<(), DeliveryError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().await.clear();
        Ok(())
    }

    async fn pending(&self) -> Vec<Notification> {
        let mut pending: Vec<Notification> = self.pending.lock().await.values().cloned().collect();
        pending.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.id.cmp(&b.id)));
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{DigestTime, FireTime};
    use chrono::NaiveDate;

    fn notification(day: u32) -> Notification {
        let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        Notification {
            id: NotificationId::for_digest(date),
            title: "Plant care reminder".to_string(),
            body: "Fern needs care today.".to_string(),
            badge_count: 1,
            fire_at: FireTime::at(date, DigestTime::default()),
        }
    }

    #[tokio::test]
    async fn submit_then_cancel_all() {
        let center = InMemoryNotificationCenter::new();

        let failures = center.submit(vec![notification(20), notification(18)]).await;
        assert!(failures.is_empty());

        let pending = center.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].fire_at.day, 18);

        center.cancel_all().await.unwrap();
        assert!(center.pending().await.is_empty());
        assert_eq!(center.cancel_calls(), 1);
    }

    #[tokio::test]
    async fn same_id_replaces_previous_request() {
        let center = InMemoryNotificationCenter::new();
        let mut updated = notification(18);
        updated.badge_count = 4;

        center.submit(vec![notification(18)]).await;
        center.submit(vec![updated.clone()]).await;

        assert_eq!(center.pending().await, vec![updated]);
    }

    #[tokio::test]
    async fn rejected_items_fail_individually() {
        let center = InMemoryNotificationCenter::new();
        center.reject(notification(19).id).await;

        let failures = center
            .submit(vec![notification(18), notification(19), notification(20)])
            .await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, notification(19).id);
        assert!(matches!(failures[0].error, DeliveryError::Rejected(_)));
        assert_eq!(center.pending().await.len(), 2);
    }
}
