//! Errors - ドメインエラー
//!
//! ルール構築・時刻指定・状態遷移で発生するエラーを定義します。
//! いずれも呼び出し側で扱えるエラーで、プロセスを止めません。

use chrono::NaiveDate;
use thiserror::Error;

use super::ids::TaskId;
use super::state::TaskStatus;

/// InvalidRuleError は不正な RecurrenceRule の構築時エラー
///
/// Schedule に取り付ける前に必ず検出されます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRuleError {
    #[error("interval must be at least one day")]
    ZeroInterval,

    #[error("{unit} set must not be empty")]
    EmptyDaySet { unit: &'static str },

    #[error("{unit} {value} is out of range (expected 1..={max})")]
    DayOutOfRange {
        unit: &'static str,
        value: u8,
        max: u8,
    },
}

/// InvalidTimeError は不正なダイジェスト時刻
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTimeError {
    #[error("hour {0} is out of range (expected 0..=23)")]
    Hour(u8),

    #[error("minute {0} is out of range (expected 0..=59)")]
    Minute(u8),

    #[error("expected HH:MM, got {0:?}")]
    Format(String),
}

/// StaleTransitionError は Due でないタスクへの reschedule
///
/// ユーザーに見せるメッセージとして Display をそのまま使えます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{task_id} was {status} and is not due again until {next_due}; change its schedule once it is due")]
pub struct StaleTransitionError {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub next_due: NaiveDate,
}
