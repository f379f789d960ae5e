//! TaskStore port - 植物とタスクの正本（source of truth）
//!
//! 永続化の方式（SQLite、同期サービスなど）はこの trait の外側の話です。
//! エンジンはここからタスク行を読み、状態遷移を書き戻します。

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::errors::StaleTransitionError;
use crate::domain::ids::{PlantId, TaskId};
use crate::domain::plant::TaskRow;
use crate::domain::recurrence::RecurrenceRule;
use crate::domain::task::Task;

/// StoreError はストア操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("plant not found: {0}")]
    PlantNotFound(PlantId),

    #[error(transparent)]
    Stale(#[from] StaleTransitionError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// TaskStore はタスクの読み出しと状態遷移の永続化
///
/// # 設計原則
/// - 遷移は `Task` のメソッドで行い、結果をまるごと保存する
/// - 読み出しは植物の表示名付きの行（`TaskRow`）で返す
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Rows that need a reminder from `as_of` on: every task with a due date.
    async fn fetch_due_tasks(&self, as_of: NaiveDate) -> Result<Vec<TaskRow>, StoreError>;

    async fn fetch_all_tasks(&self, plant_id: PlantId) -> Result<Vec<Task>, StoreError>;

    async fn mark_done(&self, task_id: TaskId, on: NaiveDate) -> Result<Task, StoreError>;

    async fn mark_skipped(&self, task_id: TaskId, on: NaiveDate) -> Result<Task, StoreError>;

    async fn reschedule(
        &self,
        task_id: TaskId,
        rule: RecurrenceRule,
        starting_on: NaiveDate,
        today: NaiveDate,
    ) -> Result<Task, StoreError>;
}
