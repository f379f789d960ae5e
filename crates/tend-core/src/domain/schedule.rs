//! Schedule - ルール・開始日・確定済みの期日を 1 つのタスクに束ねる
//!
//! # 不変条件
//! - due_date があれば start_date 以上で、かつ rule.contains(due_date)
//! - ただし発生日をまだ計算していない間は due_date == start_date を許す
//!
//! Schedule は明示的な reschedule か、状態遷移（Done / Skipped）でのみ変化します。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculator;
use super::recurrence::RecurrenceRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    start_date: NaiveDate,
    due_date: Option<NaiveDate>,
    rule: RecurrenceRule,
}

impl Schedule {
    /// New schedule: first due on its start date.
    pub fn new(rule: RecurrenceRule, start_date: NaiveDate) -> Self {
        Self {
            start_date,
            due_date: Some(start_date),
            rule,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    /// Moves the due date to the first occurrence strictly after `on`.
    ///
    /// A non-repeating rule leaves the schedule without a due date.
    pub(crate) fn advance_past(&mut self, on: NaiveDate) {
        self.due_date = calculator::next_occurrence(&self.rule, self.start_date, on);
    }

    /// Checks the due-date invariant.
    pub fn is_consistent(&self) -> bool {
        match self.due_date {
            None => true,
            Some(due) if due == self.start_date => true,
            Some(due) => due > self.start_date && self.rule.contains(self.start_date, due),
        }
    }

    /// Occurrences of this schedule within `from..=to`.
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        calculator::occurrences_between(&self.rule, self.start_date, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_schedule_is_due_on_start() {
        let schedule = Schedule::new(RecurrenceRule::daily(2).unwrap(), date(2026, 10, 1));
        assert_eq!(schedule.due_date(), Some(date(2026, 10, 1)));
        assert!(schedule.is_consistent());
    }

    #[test]
    fn start_date_off_pattern_is_still_consistent_until_advanced() {
        // Tuesday start for a Mon/Wed rule
        let mut schedule = Schedule::new(RecurrenceRule::weekly([2, 4]).unwrap(), date(2026, 10, 6));
        assert!(schedule.is_consistent());

        schedule.advance_past(date(2026, 10, 6));
        assert_eq!(schedule.due_date(), Some(date(2026, 10, 7)));
        assert!(schedule.is_consistent());
    }

    #[test]
    fn advancing_non_repeating_clears_due_date() {
        let mut schedule = Schedule::new(RecurrenceRule::None, date(2026, 10, 1));
        schedule.advance_past(date(2026, 10, 1));
        assert_eq!(schedule.due_date(), None);
        assert!(schedule.is_consistent());
    }

    #[test]
    fn occurrences_in_window() {
        let schedule = Schedule::new(RecurrenceRule::daily(5).unwrap(), date(2026, 10, 1));
        assert_eq!(
            schedule.occurrences_between(date(2026, 10, 3), date(2026, 10, 16)),
            vec![date(2026, 10, 6), date(2026, 10, 11), date(2026, 10, 16)]
        );
    }
}
