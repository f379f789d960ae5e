//! State - タスクの状態
//!
//! # 状態遷移
//! - Due → Done(on)    : mark_done
//! - Due → Skipped(on) : mark_skipped
//! - Done / Skipped → Due : 保存される遷移ではなく、today と due_date の比較から導出

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// TaskStatus はタスクの状態を表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Care is expected on the due date.
    Due,

    /// Care was performed.
    Done { on: NaiveDate },

    /// The occurrence was skipped; not counted as care.
    Skipped { on: NaiveDate },
}

impl TaskStatus {
    pub fn is_due(self) -> bool {
        matches!(self, TaskStatus::Due)
    }

    /// Date of the last recorded transition, if any.
    pub fn recorded_on(self) -> Option<NaiveDate> {
        match self {
            TaskStatus::Due => None,
            TaskStatus::Done { on } | TaskStatus::Skipped { on } => Some(on),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Due => write!(f, "due"),
            TaskStatus::Done { on } => write!(f, "done on {on}"),
            TaskStatus::Skipped { on } => write!(f, "skipped on {on}"),
        }
    }
}

/// CareEventKind は履歴に残る出来事の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareEventKind {
    Done,
    Skipped,
    Rescheduled,
}

/// CareEvent はタスク履歴の 1 行（分析・表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareEvent {
    pub kind: CareEventKind,
    pub on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_with_state_tag() {
        let on = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let v = serde_json::to_value(TaskStatus::Done { on }).unwrap();
        assert_eq!(v, serde_json::json!({"state": "done", "on": "2026-10-17"}));

        let v = serde_json::to_value(TaskStatus::Due).unwrap();
        assert_eq!(v, serde_json::json!({"state": "due"}));
    }

    #[test]
    fn display_names_the_date() {
        let on = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(TaskStatus::Skipped { on }.to_string(), "skipped on 2026-10-17");
        assert_eq!(TaskStatus::Due.recorded_on(), None);
    }
}
