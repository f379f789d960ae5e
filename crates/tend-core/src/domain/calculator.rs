//! DueDateCalculator - 次回・前回の発生日と包含判定
//!
//! すべて純粋関数です（副作用なし、どのスレッドからでも呼べる）。
//! `anchor` は Schedule の start_date で、どの結果も anchor より前にはなりません。

use chrono::{Datelike, NaiveDate};

use super::calendar::{add_days, next_month, previous_month, weekday_number, whole_days_between};
use super::recurrence::{MonthDaySet, RecurrenceRule, WeekdaySet};

/// Any day 1..=31 occurs within two consecutive months; this bounds the month walk.
const MONTH_SEARCH_LIMIT: usize = 12;

/// Does `rule`, anchored at `anchor`, have an occurrence on `date`?
///
/// Dates before the anchor are never occurrences. A non-repeating rule has
/// exactly one occurrence: the anchor itself.
pub fn contains(rule: &RecurrenceRule, anchor: NaiveDate, date: NaiveDate) -> bool {
    if date < anchor {
        return false;
    }
    match rule {
        RecurrenceRule::None => date == anchor,
        RecurrenceRule::Daily { interval } => {
            whole_days_between(anchor, date) % i64::from(interval.days()) == 0
        }
        RecurrenceRule::Weekly { weekdays } => weekdays.contains(weekday_number(date)),
        RecurrenceRule::Monthly { days } => days.contains(date.day() as u8),
    }
}

/// First occurrence strictly after `after`, never before `anchor`.
///
/// `RecurrenceRule::None` has no next occurrence.
pub fn next_occurrence(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    after: NaiveDate,
) -> Option<NaiveDate> {
    match rule {
        RecurrenceRule::None => None,
        RecurrenceRule::Daily { interval } => {
            if after < anchor {
                return Some(anchor);
            }
            let step = i64::from(interval.days());
            let cycles = whole_days_between(anchor, after) / step + 1;
            add_days(anchor, cycles * step)
        }
        RecurrenceRule::Weekly { weekdays } => {
            next_weekly_on_or_after(*weekdays, earliest_candidate(anchor, after)?)
        }
        RecurrenceRule::Monthly { days } => {
            next_monthly_on_or_after(*days, earliest_candidate(anchor, after)?)
        }
    }
}

/// Same as [`next_occurrence`]; the name used when materializing a Schedule's due date.
pub fn compute_due_date(
    rule: &RecurrenceRule,
    start_date: NaiveDate,
    after: NaiveDate,
) -> Option<NaiveDate> {
    next_occurrence(rule, start_date, after)
}

/// Last occurrence strictly before `before`, never before `anchor`.
pub fn previous_occurrence(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    before: NaiveDate,
) -> Option<NaiveDate> {
    let latest = before.pred_opt()?;
    if latest < anchor {
        return None;
    }
    let found = match rule {
        RecurrenceRule::None => Some(anchor),
        RecurrenceRule::Daily { interval } => {
            let step = i64::from(interval.days());
            let cycles = whole_days_between(anchor, latest) / step;
            add_days(anchor, cycles * step)
        }
        RecurrenceRule::Weekly { weekdays } => previous_weekly_on_or_before(*weekdays, latest),
        RecurrenceRule::Monthly { days } => previous_monthly_on_or_before(*days, latest),
    };
    found.filter(|date| *date >= anchor)
}

/// Every occurrence in the inclusive range `from..=to`.
pub fn occurrences_between(
    rule: &RecurrenceRule,
    anchor: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<NaiveDate> {
    let mut found = Vec::new();
    if from > to {
        return found;
    }
    if let RecurrenceRule::None = rule {
        if (from..=to).contains(&anchor) {
            found.push(anchor);
        }
        return found;
    }

    if contains(rule, anchor, from) {
        found.push(from);
    }
    let mut cursor = from;
    while let Some(next) = next_occurrence(rule, anchor, cursor) {
        if next > to {
            break;
        }
        found.push(next);
        cursor = next;
    }
    found
}

fn earliest_candidate(anchor: NaiveDate, after: NaiveDate) -> Option<NaiveDate> {
    Some(after.succ_opt()?.max(anchor))
}

fn next_weekly_on_or_after(weekdays: WeekdaySet, from: NaiveDate) -> Option<NaiveDate> {
    let current = weekday_number(from);
    if weekdays.contains(current) {
        return Some(from);
    }
    // smallest later weekday this week, else wrap into the following week
    let target = weekdays.next_after(current).unwrap_or(weekdays.first() + 7);
    add_days(from, i64::from(target - current))
}

fn previous_weekly_on_or_before(weekdays: WeekdaySet, from: NaiveDate) -> Option<NaiveDate> {
    let current = i64::from(weekday_number(from));
    if weekdays.contains(current as u8) {
        return Some(from);
    }
    let target = weekdays
        .last_before(current as u8)
        .map(i64::from)
        .unwrap_or(i64::from(weekdays.last()) - 7);
    add_days(from, target - current)
}

fn next_monthly_on_or_after(days: MonthDaySet, from: NaiveDate) -> Option<NaiveDate> {
    let (mut year, mut month) = (from.year(), from.month());
    let mut min_day = from.day();
    for _ in 0..MONTH_SEARCH_LIMIT {
        // from_ymd_opt rejects days the month does not have: skipped, never clamped
        let hit = days
            .iter()
            .filter(|day| u32::from(*day) >= min_day)
            .find_map(|day| NaiveDate::from_ymd_opt(year, month, u32::from(day)));
        if hit.is_some() {
            return hit;
        }
        (year, month) = next_month(year, month);
        min_day = 1;
    }
    None
}

fn previous_monthly_on_or_before(days: MonthDaySet, from: NaiveDate) -> Option<NaiveDate> {
    let (mut year, mut month) = (from.year(), from.month());
    let mut max_day = from.day();
    for _ in 0..MONTH_SEARCH_LIMIT {
        let hit = days
            .iter()
            .rev()
            .filter(|day| u32::from(*day) <= max_day)
            .find_map(|day| NaiveDate::from_ymd_opt(year, month, u32::from(day)));
        if hit.is_some() {
            return hit;
        }
        (year, month) = previous_month(year, month);
        max_day = 31;
    }
    None
}

impl RecurrenceRule {
    /// See [`contains`].
    pub fn contains(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        contains(self, anchor, date)
    }

    /// See [`next_occurrence`].
    pub fn next_occurrence(&self, anchor: NaiveDate, after: NaiveDate) -> Option<NaiveDate> {
        next_occurrence(self, anchor, after)
    }

    /// See [`previous_occurrence`].
    pub fn previous_occurrence(&self, anchor: NaiveDate, before: NaiveDate) -> Option<NaiveDate> {
        previous_occurrence(self, anchor, before)
    }
}
