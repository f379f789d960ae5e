//! Domain model (rules, schedules, tasks, digests, ...).
//!
//! ここにあるものはすべて同期・副作用なしの値と関数です。
//! I/O はポート（`crate::ports`）越しにのみ行います。

pub mod calculator;
pub mod calendar;
pub mod digest;
pub mod errors;
pub mod ids;
pub mod lateness;
pub mod notification;
pub mod plant;
pub mod recurrence;
pub mod schedule;
pub mod state;
pub mod task;

pub use calculator::{compute_due_date, next_occurrence, occurrences_between, previous_occurrence};
pub use digest::{DEFAULT_DIGEST_TITLE, ReminderDigestBuilder, digest, recompute};
pub use errors::{InvalidRuleError, InvalidTimeError, StaleTransitionError};
pub use ids::{Id, IdMarker, PlantId, TaskId};
pub use lateness::{LateTask, Lateness, classify, days_late, triage};
pub use notification::{DigestTime, FireTime, Notification, NotificationId, NotificationSettings};
pub use plant::{Plant, TaskRow};
pub use recurrence::{DaySet, Interval, MonthDaySet, RecurrenceRule, WeekdaySet};
pub use schedule::Schedule;
pub use state::{CareEvent, CareEventKind, TaskStatus};
pub use task::{CareKind, Task};
