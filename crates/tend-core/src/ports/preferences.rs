//! PreferenceStore port - ユーザー設定の読み出し

use async_trait::async_trait;

use crate::domain::notification::NotificationSettings;

/// PreferenceStore は通知設定を値として返す
///
/// スケジューラは 1 回のパスの中で 2 回読みます（開始時と cancel 直後）。
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn notification_settings(&self) -> NotificationSettings;
}
