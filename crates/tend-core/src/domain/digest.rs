//! ReminderDigestBuilder - 1 日 1 通のリマインダーダイジェストを組み立てる
//!
//! # アルゴリズム
//! 1. 期日があり、その期日（バケット日）に実効状態が Due のタスクだけを対象にする
//! 2. バケット日 = max(due_date, today)。期限切れは今日のバケットに畳み込む
//! 3. バケットごとに植物の表示名を重複なしで集める
//! 4. 本文・バッジ数・発火時刻を決める
//!
//! 純粋関数です。入力の並び順に関係なく同じ結果になります。

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::ids::TaskId;
use super::notification::{DigestTime, FireTime, Notification, NotificationId, NotificationSettings};
use super::plant::TaskRow;

pub const DEFAULT_DIGEST_TITLE: &str = "Plant care reminder";

/// Plants named explicitly in a digest body before the remainder is summarized.
const NAMED_PLANTS: usize = 3;

#[derive(Default)]
struct Bucket<'a> {
    tasks: BTreeSet<TaskId>,
    // display name -> earliest due date among its tasks in this bucket
    plants: BTreeMap<&'a str, NaiveDate>,
}

impl<'a> Bucket<'a> {
    fn add(&mut self, row: &'a TaskRow, due: NaiveDate) {
        self.tasks.insert(row.task.id());
        self.plants
            .entry(row.plant_name.as_str())
            .and_modify(|earliest| *earliest = (*earliest).min(due))
            .or_insert(due);
    }

    /// Most overdue first, then alphabetical.
    fn ordered_names(&self) -> Vec<&'a str> {
        let mut names: Vec<(NaiveDate, &'a str)> =
            self.plants.iter().map(|(name, due)| (*due, *name)).collect();
        names.sort();
        names.into_iter().map(|(_, name)| name).collect()
    }
}

/// ReminderDigestBuilder はダイジェスト通知を生成する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDigestBuilder {
    digest_time: DigestTime,
    title: String,
}

impl ReminderDigestBuilder {
    pub fn new(digest_time: DigestTime) -> Self {
        Self {
            digest_time,
            title: DEFAULT_DIGEST_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// One notification per day that has care due, sorted by fire time.
    pub fn build(&self, rows: &[TaskRow], today: NaiveDate) -> Vec<Notification> {
        let mut buckets: BTreeMap<NaiveDate, Bucket<'_>> = BTreeMap::new();
        for row in rows {
            let Some(due) = row.task.due_date() else {
                continue;
            };
            let bucket = due.max(today);
            if !row.task.is_due_on(bucket) {
                continue;
            }
            buckets.entry(bucket).or_default().add(row, due);
        }

        // BTreeMap iteration is already chronological
        buckets
            .into_iter()
            .filter(|(_, bucket)| !bucket.plants.is_empty())
            .map(|(date, bucket)| Notification {
                id: NotificationId::for_digest(date),
                title: self.title.clone(),
                body: compose_body(&bucket.ordered_names()),
                badge_count: u32::try_from(bucket.tasks.len()).unwrap_or(u32::MAX),
                fire_at: FireTime::at(date, self.digest_time),
            })
            .collect()
    }
}

impl Default for ReminderDigestBuilder {
    fn default() -> Self {
        Self::new(DigestTime::default())
    }
}

/// Digest for `rows` with the default title.
pub fn digest(rows: &[TaskRow], today: NaiveDate, preferred_time: DigestTime) -> Vec<Notification> {
    ReminderDigestBuilder::new(preferred_time).build(rows, today)
}

/// Full notification set for the given settings; empty while notifications are disabled.
pub fn recompute(
    rows: &[TaskRow],
    today: NaiveDate,
    settings: &NotificationSettings,
) -> Vec<Notification> {
    if !settings.enabled {
        return Vec::new();
    }
    digest(rows, today, settings.digest_time)
}

fn compose_body(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => format!("{one} needs care today."),
        [a, b] => format!("{a} and {b} need care today."),
        [a, b, c] => format!("{a}, {b}, and {c} need care today."),
        _ => {
            let others = names.len() - NAMED_PLANTS;
            let plural = if others == 1 { "plant" } else { "plants" };
            format!(
                "{}, and {others} other {plural} need care today.",
                names[..NAMED_PLANTS].join(", ")
            )
        }
    }
}
