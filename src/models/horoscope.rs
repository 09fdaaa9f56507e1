use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::sign::ZodiacSign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// How long a row is kept before the purge job removes it.
    #[must_use]
    pub fn retention(self) -> Duration {
        match self {
            Self::Daily => Duration::days(2),
            Self::Weekly => Duration::days(8),
            Self::Monthly => Duration::days(32),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(format!("Unknown period '{other}', expected daily, weekly or monthly")),
        }
    }
}

/// A parsed reading as held by the cache.
///
/// `period_key` identifies the bucket (`2024-05-01`, `mar 3, 2025 - mar 9, 2025`,
/// `march 2025`) and `label` is the date/week/month text scraped alongside the body.
/// The two fields coincide for weekly and monthly readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoroscopeEntry {
    pub sign: ZodiacSign,
    pub period: Period,
    pub period_key: String,
    pub label: String,
    pub body: String,
    pub standout_days: String,
    pub challenging_days: String,
    pub fetched_at: DateTime<Utc>,
}

impl HoroscopeEntry {
    #[must_use]
    pub fn new(
        sign: ZodiacSign,
        period: Period,
        period_key: impl Into<String>,
        label: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sign,
            period,
            period_key: period_key.into(),
            label: label.into(),
            body: body.into(),
            standout_days: String::new(),
            challenging_days: String::new(),
            fetched_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_days(mut self, standout: impl Into<String>, challenging: impl Into<String>) -> Self {
        self.standout_days = standout.into();
        self.challenging_days = challenging.into();
        self
    }

    #[must_use]
    pub const fn fetched_at(mut self, at: DateTime<Utc>) -> Self {
        self.fetched_at = at;
        self
    }

    /// Whether the purge job may drop this entry.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.fetched_at < now - self.period.retention()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHoroscope {
    pub date: String,
    pub horoscope_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHoroscope {
    pub week: String,
    pub horoscope_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyHoroscope {
    pub month: String,
    pub horoscope_data: String,
    pub standout_days: String,
    pub challenging_days: String,
}
