//! Period-aware storage for parsed horoscope readings.
//!
//! Freshness is not a TTL. A daily reading is valid for exactly the key it
//! was stored under; weekly and monthly readings are stored one row per sign
//! and only count as a hit while the stored period key still equals the
//! current one.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{HoroscopeEntry, Period, ZodiacSign};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache storage error: {0}")]
    Storage(String),

    #[error("Corrupt cache row: {0}")]
    Corrupt(String),
}

impl From<sea_orm::DbErr> for CacheError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Rows removed by one purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub daily: u64,
    pub weekly: u64,
    pub monthly: u64,
}

impl PurgeReport {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.daily + self.weekly + self.monthly
    }
}

#[async_trait::async_trait]
pub trait HoroscopeCache: Send + Sync {
    /// Looks up a reading.
    ///
    /// For [`Period::Daily`] this is an exact match on `(sign, period_key)`.
    /// For weekly and monthly the single row stored for `sign` is returned
    /// only if its period key equals `period_key`, case-insensitively.
    ///
    /// A missing or stale entry is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Storage`] if the backing store fails.
    async fn get(
        &self,
        period: Period,
        sign: ZodiacSign,
        period_key: &str,
    ) -> Result<Option<HoroscopeEntry>, CacheError>;

    /// Inserts or fully replaces the entry for its key. Period key and label
    /// are stored lower-cased.
    async fn put(&self, entry: &HoroscopeEntry) -> Result<(), CacheError>;

    /// Removes entries older than their period's retention window.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeReport, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// Fixed-width UTC timestamp so stored values order lexicographically.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CacheError::Corrupt(format!("bad timestamp {value:?}: {e}")))
}

/// Lower-cases key and label the way they are persisted.
#[must_use]
pub fn normalized(entry: &HoroscopeEntry) -> HoroscopeEntry {
    HoroscopeEntry {
        period_key: entry.period_key.to_lowercase(),
        label: entry.label.to_lowercase(),
        ..entry.clone()
    }
}
