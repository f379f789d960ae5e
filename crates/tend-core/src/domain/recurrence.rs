//! RecurrenceRule - 繰り返しパターン
//!
//! 頻度・間隔・曜日集合を別々のフィールドで持つのではなく、
//! 1 つのタグ付き enum として表現します。各 variant のペイロードは検証済みの
//! newtype（[`Interval`], [`WeekdaySet`], [`MonthDaySet`]）なので、
//! 「interval 0」や「空の曜日集合」のような不正な組み合わせは値として存在できません。
//!
//! # 設計原則
//! - 構築は `RecurrenceRule::daily / weekly / monthly` 経由で、失敗は [`InvalidRuleError`]
//! - serde でのデシリアライズも `try_from` を通るので、保存データから検証を迂回できない

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::errors::InvalidRuleError;

/// Positive day interval for `Daily` rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Interval(NonZeroU32);

impl Interval {
    pub fn new(days: u32) -> Result<Self, InvalidRuleError> {
        NonZeroU32::new(days)
            .map(Self)
            .ok_or(InvalidRuleError::ZeroInterval)
    }

    pub fn days(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Interval {
    type Error = InvalidRuleError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.days()
    }
}

/// DaySet は 1..=MAX の非空集合（ビットマスク）
///
/// - `DaySet<7>`: 曜日（1 = 日曜 … 7 = 土曜）
/// - `DaySet<31>`: 日付（1..=31）
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DaySet<const MAX: u8>(u32);

/// Weekdays of a `Weekly` rule, 1 = Sunday … 7 = Saturday.
pub type WeekdaySet = DaySet<7>;

/// Days of month of a `Monthly` rule, 1..=31.
pub type MonthDaySet = DaySet<31>;

impl<const MAX: u8> DaySet<MAX> {
    fn unit() -> &'static str {
        if MAX == 7 { "weekday" } else { "day of month" }
    }

    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self, InvalidRuleError> {
        let mut bits = 0u32;
        for value in days {
            if value == 0 || value > MAX {
                return Err(InvalidRuleError::DayOutOfRange {
                    unit: Self::unit(),
                    value,
                    max: MAX,
                });
            }
            bits |= 1 << (value - 1);
        }
        if bits == 0 {
            return Err(InvalidRuleError::EmptyDaySet { unit: Self::unit() });
        }
        Ok(Self(bits))
    }

    pub fn contains(self, day: u8) -> bool {
        day >= 1 && day <= MAX && self.0 & (1 << (day - 1)) != 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = u8> {
        (1..=MAX).filter(move |day| self.contains(*day))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Smallest member.
    pub fn first(self) -> u8 {
        // non-empty by construction
        self.0.trailing_zeros() as u8 + 1
    }

    /// Largest member.
    pub fn last(self) -> u8 {
        (u32::BITS - self.0.leading_zeros()) as u8
    }

    /// Smallest member strictly greater than `day`.
    pub fn next_after(self, day: u8) -> Option<u8> {
        self.iter().find(|member| *member > day)
    }

    /// Largest member strictly smaller than `day`.
    pub fn last_before(self, day: u8) -> Option<u8> {
        self.iter().rev().find(|member| *member < day)
    }
}

impl<const MAX: u8> fmt::Debug for DaySet<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<const MAX: u8> TryFrom<Vec<u8>> for DaySet<MAX> {
    type Error = InvalidRuleError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl<const MAX: u8> From<DaySet<MAX>> for Vec<u8> {
    fn from(set: DaySet<MAX>) -> Self {
        set.iter().collect()
    }
}

/// RecurrenceRule はタスクが繰り返される暦日のパターン
///
/// Weekly / Monthly は 1 サイクル刻み固定、Daily は任意の正の間隔。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Does not repeat.
    #[default]
    None,

    /// Every `interval` days counted from the schedule's start date.
    Daily { interval: Interval },

    /// Every matching weekday.
    Weekly { weekdays: WeekdaySet },

    /// Every matching day of month; days a month does not have are skipped.
    Monthly { days: MonthDaySet },
}

impl RecurrenceRule {
    pub fn daily(interval_days: u32) -> Result<Self, InvalidRuleError> {
        Ok(Self::Daily {
            interval: Interval::new(interval_days)?,
        })
    }

    pub fn weekly(weekdays: impl IntoIterator<Item = u8>) -> Result<Self, InvalidRuleError> {
        Ok(Self::Weekly {
            weekdays: WeekdaySet::new(weekdays)?,
        })
    }

    pub fn monthly(days: impl IntoIterator<Item = u8>) -> Result<Self, InvalidRuleError> {
        Ok(Self::Monthly {
            days: MonthDaySet::new(days)?,
        })
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn ordinal(day: u8) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "does not repeat"),
            Self::Daily { interval } if interval.days() == 1 => write!(f, "every day"),
            Self::Daily { interval } => write!(f, "every {} days", interval.days()),
            Self::Weekly { weekdays } => {
                let names: Vec<&str> = weekdays
                    .iter()
                    .map(|day| WEEKDAY_NAMES[usize::from(day - 1)])
                    .collect();
                write!(f, "weekly on {}", names.join(", "))
            }
            Self::Monthly { days } => {
                let days: Vec<String> = days.iter().map(ordinal).collect();
                write!(f, "monthly on the {}", days.join(", "))
            }
        }
    }
}
