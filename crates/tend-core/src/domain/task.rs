//! Task record: schedule + status machine.
//!
//! Design:
//! - Schedule is mutated only via transitions (`mark_done` / `mark_skipped`) or `reschedule`.
//! - Re-entry to Due is derived from `today` vs `due_date` (`status_on`), never stored.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::StaleTransitionError;
use super::ids::{PlantId, TaskId};
use super::recurrence::RecurrenceRule;
use super::schedule::Schedule;
use super::state::{CareEvent, CareEventKind, TaskStatus};

/// What kind of care a task stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareKind {
    Watering,
    Fertilizing,
    Misting,
    Pruning,
    Repotting,
    Rotating,
    Custom(String),
}

impl fmt::Display for CareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CareKind::Watering => "watering",
            CareKind::Fertilizing => "fertilizing",
            CareKind::Misting => "misting",
            CareKind::Pruning => "pruning",
            CareKind::Repotting => "repotting",
            CareKind::Rotating => "rotating",
            CareKind::Custom(label) => label.as_str(),
        };
        f.write_str(label)
    }
}

/// A single care task of a plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    plant_id: PlantId,
    kind: CareKind,
    schedule: Option<Schedule>,
    status: TaskStatus,
    last_completed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<CareEvent>,
}

impl Task {
    /// New scheduled task: Due, first due on `start_date`.
    pub fn new(
        id: TaskId,
        plant_id: PlantId,
        kind: CareKind,
        rule: RecurrenceRule,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            schedule: Some(Schedule::new(rule, start_date)),
            ..Self::unscheduled(id, plant_id, kind)
        }
    }

    /// Task configured without any schedule yet.
    pub fn unscheduled(id: TaskId, plant_id: PlantId, kind: CareKind) -> Self {
        Self {
            id,
            plant_id,
            kind,
            schedule: None,
            status: TaskStatus::Due,
            last_completed_date: None,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn plant_id(&self) -> PlantId {
        self.plant_id
    }

    pub fn kind(&self) -> &CareKind {
        &self.kind
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Stored status (the last transition).
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn last_completed_date(&self) -> Option<NaiveDate> {
        self.last_completed_date
    }

    pub fn history(&self) -> &[CareEvent] {
        &self.history
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.schedule.as_ref().and_then(Schedule::due_date)
    }

    /// Status as seen on `today`.
    ///
    /// A Done / Skipped task is Due again once its due date has arrived, or
    /// right away when it has no due date left (it waits for a manual reschedule).
    pub fn status_on(&self, today: NaiveDate) -> TaskStatus {
        match (self.status, self.due_date()) {
            (TaskStatus::Due, _) => TaskStatus::Due,
            (recorded, Some(due)) if due > today => recorded,
            _ => TaskStatus::Due,
        }
    }

    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.status_on(today).is_due()
    }

    /// Records care on `on` and advances the due date past it.
    pub fn mark_done(&mut self, on: NaiveDate) {
        self.status = TaskStatus::Done { on };
        self.last_completed_date = Some(on);
        self.advance_past(on);
        self.history.push(CareEvent {
            kind: CareEventKind::Done,
            on,
        });
    }

    /// Skips the occurrence; same advancement, but not counted as care.
    pub fn mark_skipped(&mut self, on: NaiveDate) {
        self.status = TaskStatus::Skipped { on };
        self.advance_past(on);
        self.history.push(CareEvent {
            kind: CareEventKind::Skipped,
            on,
        });
    }

    /// Replaces rule, start date and due date at once.
    ///
    /// Only legal while the task is Due on `today`. Any pending reminder for the
    /// task is stale afterwards; the caller re-runs the notification scheduler.
    pub fn reschedule(
        &mut self,
        rule: RecurrenceRule,
        starting_on: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), StaleTransitionError> {
        let current = self.status_on(today);
        if !current.is_due() {
            return Err(StaleTransitionError {
                task_id: self.id,
                status: current,
                // status_on reports non-Due only while a future due date exists
                next_due: self.due_date().unwrap_or(today),
            });
        }
        self.schedule = Some(Schedule::new(rule, starting_on));
        self.status = TaskStatus::Due;
        self.history.push(CareEvent {
            kind: CareEventKind::Rescheduled,
            on: today,
        });
        Ok(())
    }

    fn advance_past(&mut self, on: NaiveDate) {
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.advance_past(on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::add_days;
    use rstest::rstest;
    use ulid::Ulid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(rule: RecurrenceRule, start: NaiveDate) -> Task {
        Task::new(
            TaskId::from_ulid(Ulid::from(1u128)),
            PlantId::from_ulid(Ulid::from(2u128)),
            CareKind::Watering,
            rule,
            start,
        )
    }

    #[test]
    fn new_task_is_due_on_start() {
        let t = task(RecurrenceRule::daily(3).unwrap(), date(2026, 10, 1));
        assert_eq!(t.status(), TaskStatus::Due);
        assert_eq!(t.due_date(), Some(date(2026, 10, 1)));
        assert_eq!(t.last_completed_date(), None);
    }

    #[test]
    fn mark_done_advances_from_anchor() {
        let mut t = task(RecurrenceRule::daily(3).unwrap(), date(2026, 10, 1));
        t.mark_done(date(2026, 10, 5));

        assert_eq!(t.status(), TaskStatus::Done { on: date(2026, 10, 5) });
        assert_eq!(t.due_date(), Some(date(2026, 10, 7)));
        assert_eq!(t.last_completed_date(), Some(date(2026, 10, 5)));
        assert_eq!(t.history().len(), 1);
    }

    #[test]
    fn mark_skipped_does_not_count_as_care() {
        let mut t = task(RecurrenceRule::weekly([2, 4, 6]).unwrap(), date(2026, 10, 5));
        t.mark_skipped(date(2026, 10, 5));

        assert_eq!(t.status(), TaskStatus::Skipped { on: date(2026, 10, 5) });
        assert_eq!(t.due_date(), Some(date(2026, 10, 7)));
        assert_eq!(t.last_completed_date(), None);
        assert_eq!(t.history()[0].kind, CareEventKind::Skipped);
    }

    #[rstest]
    #[case(RecurrenceRule::daily(1).unwrap())]
    #[case(RecurrenceRule::daily(4).unwrap())]
    #[case(RecurrenceRule::weekly([1, 7]).unwrap())]
    #[case(RecurrenceRule::monthly([31]).unwrap())]
    #[case(RecurrenceRule::monthly([5, 20]).unwrap())]
    fn transitions_always_advance_strictly_past_completion(#[case] rule: RecurrenceRule) {
        let start = date(2026, 1, 10);
        for offset in -5..120i64 {
            let on = add_days(start, offset).unwrap();

            let mut done = task(rule, start);
            done.mark_done(on);
            let due = done.due_date().unwrap();
            assert!(due > on, "{rule}: done on {on} gave {due}");

            let mut skipped = task(rule, start);
            skipped.mark_skipped(on);
            assert_eq!(skipped.due_date(), Some(due));
        }
    }

    #[test]
    fn non_repeating_task_becomes_schedule_less() {
        let mut t = task(RecurrenceRule::None, date(2026, 10, 1));
        t.mark_done(date(2026, 10, 1));

        assert_eq!(t.due_date(), None);
        // waits for a manual reschedule
        assert!(t.is_due_on(date(2026, 10, 2)));
    }

    #[test]
    fn re_entry_to_due_is_derived_from_today() {
        let mut t = task(RecurrenceRule::daily(7).unwrap(), date(2026, 10, 1));
        t.mark_done(date(2026, 10, 1));

        assert_eq!(t.status_on(date(2026, 10, 7)), TaskStatus::Done { on: date(2026, 10, 1) });
        assert_eq!(t.status_on(date(2026, 10, 8)), TaskStatus::Due);
        assert_eq!(t.status_on(date(2026, 10, 20)), TaskStatus::Due);
        // stored status is untouched
        assert_eq!(t.status(), TaskStatus::Done { on: date(2026, 10, 1) });
    }

    #[test]
    fn reschedule_replaces_schedule_while_due() {
        let mut t = task(RecurrenceRule::daily(7).unwrap(), date(2026, 10, 1));
        let rule = RecurrenceRule::weekly([2]).unwrap();

        t.reschedule(rule, date(2026, 10, 12), date(2026, 10, 3)).unwrap();

        let schedule = t.schedule().unwrap();
        assert_eq!(schedule.rule(), &rule);
        assert_eq!(schedule.start_date(), date(2026, 10, 12));
        assert_eq!(t.due_date(), Some(date(2026, 10, 12)));
        assert_eq!(t.status(), TaskStatus::Due);
        assert_eq!(t.history().last().unwrap().kind, CareEventKind::Rescheduled);
    }

    #[test]
    fn reschedule_is_rejected_until_due_again() {
        let mut t = task(RecurrenceRule::daily(7).unwrap(), date(2026, 10, 1));
        t.mark_done(date(2026, 10, 2));
        let before = t.clone();

        let err = t
            .reschedule(RecurrenceRule::daily(1).unwrap(), date(2026, 10, 4), date(2026, 10, 4))
            .unwrap_err();

        assert_eq!(err.next_due, date(2026, 10, 8));
        assert_eq!(err.status, TaskStatus::Done { on: date(2026, 10, 2) });
        assert!(err.to_string().contains("not due again until 2026-10-08"));
        assert_eq!(t, before);

        // once due again the same call succeeds
        t.reschedule(RecurrenceRule::daily(1).unwrap(), date(2026, 10, 9), date(2026, 10, 8))
            .unwrap();
        assert_eq!(t.due_date(), Some(date(2026, 10, 9)));
    }

    #[test]
    fn unscheduled_task_can_be_scheduled() {
        let mut t = Task::unscheduled(
            TaskId::from_ulid(Ulid::from(3u128)),
            PlantId::from_ulid(Ulid::from(2u128)),
            CareKind::Custom("dusting leaves".to_string()),
        );
        assert_eq!(t.due_date(), None);
        assert_eq!(t.kind().to_string(), "dusting leaves");

        t.reschedule(RecurrenceRule::monthly([1]).unwrap(), date(2026, 11, 1), date(2026, 10, 17))
            .unwrap();
        assert_eq!(t.due_date(), Some(date(2026, 11, 1)));
    }
}
