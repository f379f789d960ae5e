//! NotificationCenter port - OS のローカル通知サービス
//!
//! 通知の保持・発火は配送側の責務です。エンジンは「全部消して、全部出し直す」だけ。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{Notification, NotificationId};

/// DeliveryError は通知 1 件（または一括操作）の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("notification center unavailable: {0}")]
    Unavailable(String),
}

/// SubmitFailure は submit で受け付けられなかった 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    pub id: NotificationId,
    pub error: DeliveryError,
}

/// NotificationCenter は通知の登録・取り消し
///
/// # 設計原則
/// - submit は 1 件ずつ独立（1 件の失敗で残りを止めない）
/// - cancel_all はこのアプリの保留中通知をすべて消す
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    async fn is_authorized(&self) -> bool;

    /// Submits each request independently; returns the ones that failed.
    async fn submit(&self, requests: Vec<Notification>) -> Vec<SubmitFailure>;

    async fn cancel_all(&self) -> Result<(), DeliveryError>;

    async fn pending(&self) -> Vec<Notification>;
}
