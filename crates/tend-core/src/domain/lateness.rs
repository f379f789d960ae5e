//! LateTaskClassifier - 遅れ日数の算出（表示・通知のトリアージ用）
//!
//! 読み取り専用です。状態は一切変更しません。

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::whole_days_between;
use super::plant::TaskRow;
use super::task::Task;

/// Whole days a task is overdue on `today`; 0 unless it is Due with a past due date.
pub fn days_late(task: &Task, today: NaiveDate) -> i64 {
    match task.due_date() {
        Some(due) if due < today && task.is_due_on(today) => whole_days_between(due, today).max(0),
        _ => 0,
    }
}

/// Lateness はタスクの期日に対する位置づけ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "lateness", rename_all = "snake_case")]
pub enum Lateness {
    /// No due date: never scheduled, or a one-off waiting for a reschedule.
    Unscheduled,
    /// Due in the future (or completed until then).
    Upcoming { in_days: i64 },
    DueToday,
    Late { days: i64 },
}

pub fn classify(task: &Task, today: NaiveDate) -> Lateness {
    let Some(due) = task.due_date() else {
        return Lateness::Unscheduled;
    };
    match days_late(task, today) {
        0 if due == today => Lateness::DueToday,
        0 => Lateness::Upcoming {
            in_days: whole_days_between(today, due).max(0),
        },
        days => Lateness::Late { days },
    }
}

/// LateTask はトリアージ結果の 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateTask<'a> {
    pub row: &'a TaskRow,
    pub days_late: i64,
}

/// Late rows, most overdue first (ties by plant name, then task id).
pub fn triage(rows: &[TaskRow], today: NaiveDate) -> Vec<LateTask<'_>> {
    let mut late: Vec<LateTask<'_>> = rows
        .iter()
        .map(|row| LateTask {
            row,
            days_late: days_late(&row.task, today),
        })
        .filter(|late| late.days_late > 0)
        .collect();
    late.sort_by(|a, b| {
        b.days_late
            .cmp(&a.days_late)
            .then_with(|| a.row.plant_name.cmp(&b.row.plant_name))
            .then_with(|| a.row.task.id().cmp(&b.row.task.id()))
    });
    late
}
