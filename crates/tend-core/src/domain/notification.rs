//! Notification - エンジンが生成する一時的な出力値
//!
//! 通知の永続化は配送サービス側の責務です。エンジンは毎回まるごと作り直します。

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::errors::InvalidTimeError;

/// Stable notification identifier; digests are keyed by their calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Identifier of the digest for `date`.
    pub fn for_digest(date: NaiveDate) -> Self {
        Self(format!("tend.digest.{date}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// DigestTime はダイジェストを届ける時刻（ローカル時刻、分単位）
///
/// 設定ファイルでは `"07:30"` 形式で読み書きします。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigestTime {
    hour: u8,
    minute: u8,
}

impl DigestTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, InvalidTimeError> {
        if hour > 23 {
            return Err(InvalidTimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(InvalidTimeError::Minute(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl Default for DigestTime {
    /// 07:30 local.
    fn default() -> Self {
        Self {
            hour: 7,
            minute: 30,
        }
    }
}

impl fmt::Display for DigestTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for DigestTime {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || InvalidTimeError::Format(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(format_error)?;
        let hour = hour.parse().map_err(|_| format_error())?;
        let minute = minute.parse().map_err(|_| format_error())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for DigestTime {
    type Error = InvalidTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DigestTime> for String {
    fn from(time: DigestTime) -> Self {
        time.to_string()
    }
}

/// FireTime は配送サービスに渡す壁時計の日時（年・月・日・時・分）
///
/// フィールド順に比較すると時系列順になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FireTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl FireTime {
    pub fn at(date: NaiveDate, time: DigestTime) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: u32::from(time.hour()),
            minute: u32::from(time.minute()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for FireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// A scheduled local notification request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub badge_count: u32,
    pub fire_at: FireTime,
}

/// NotificationSettings はユーザー設定（グローバル状態ではなく値として渡す）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub digest_time: DigestTime,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            digest_time: DigestTime::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_digest_time_is_half_past_seven() {
        assert_eq!(DigestTime::default(), DigestTime::new(7, 30).unwrap());
        assert_eq!(DigestTime::default().to_string(), "07:30");
    }

    #[rstest]
    #[case("07:30", Ok(DigestTime::new(7, 30).unwrap()))]
    #[case(" 21:05 ", Ok(DigestTime::new(21, 5).unwrap()))]
    #[case("24:00", Err(InvalidTimeError::Hour(24)))]
    #[case("08:60", Err(InvalidTimeError::Minute(60)))]
    #[case("0830", Err(InvalidTimeError::Format("0830".to_string())))]
    fn digest_time_parses(#[case] input: &str, #[case] expected: Result<DigestTime, InvalidTimeError>) {
        assert_eq!(input.parse::<DigestTime>(), expected);
    }

    #[test]
    fn fire_time_combines_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let fire_at = FireTime::at(date, DigestTime::new(7, 30).unwrap());

        assert_eq!(
            fire_at,
            FireTime { year: 2026, month: 10, day: 17, hour: 7, minute: 30 }
        );
        assert_eq!(fire_at.to_string(), "2026-10-17 07:30");
        assert_eq!(fire_at.date(), Some(date));
    }

    #[test]
    fn fire_times_order_chronologically() {
        let time = DigestTime::default();
        let a = FireTime::at(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(), time);
        let b = FireTime::at(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(), time);
        assert!(a < b);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: NotificationSettings = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.digest_time, DigestTime::default());
    }
}
