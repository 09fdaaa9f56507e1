//! Scrape-parse-cache pipeline.
//!
//! Resolves the period key for the request, serves the cached reading when
//! one exists for that key, and otherwise scrapes the upstream page, parses
//! it and stores the result before returning it.
//!
//! Two concurrent misses for the same key both fetch upstream and both
//! write; the later write wins. Requests are not coalesced.

use chrono::NaiveDateTime;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::clients::horoscope::{FetchError, HoroscopeClient};
use crate::models::{
    DailyHoroscope, HoroscopeEntry, MonthlyHoroscope, Period, UnknownSign, WeeklyHoroscope,
    ZodiacSign,
};
use crate::parser::horoscope::{self as extractor, ParseError};
use crate::services::cache_service::{CacheError, HoroscopeCache, PurgeReport};
use crate::services::period::{self, title_case};

#[derive(Debug, Error)]
pub enum HoroscopeError {
    #[error("No such zodiac sign exists: {0}")]
    UnknownSign(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Unsupported day alias: {0}")]
    UnsupportedDayAlias(String),

    #[error("Future date is not supported")]
    FutureDateNotSupported,

    #[error("Failed to parse horoscope page: {0}")]
    Parse(#[from] ParseError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<UnknownSign> for HoroscopeError {
    fn from(err: UnknownSign) -> Self {
        Self::UnknownSign(err.0)
    }
}

#[derive(Clone)]
pub struct HoroscopeService {
    cache: Arc<dyn HoroscopeCache>,
    client: HoroscopeClient,
}

impl HoroscopeService {
    #[must_use]
    pub fn new(cache: Arc<dyn HoroscopeCache>, client: HoroscopeClient) -> Self {
        Self { cache, client }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn HoroscopeCache> {
        &self.cache
    }

    pub async fn daily(
        &self,
        sign: &str,
        day: &str,
        now: NaiveDateTime,
    ) -> Result<DailyHoroscope, HoroscopeError> {
        let sign: ZodiacSign = sign.parse()?;
        let key = period::resolve_daily_key(day, now)?;
        let period_key = key.period_key();

        let entry = match self.lookup(Period::Daily, sign, &period_key).await? {
            Some(entry) => entry,
            None => {
                let html = self.client.fetch_daily(sign, key.day).await?;
                let fields = extractor::parse_daily(&html)?;
                let entry =
                    HoroscopeEntry::new(sign, Period::Daily, period_key, fields.date, fields.body);
                self.store(entry).await?
            }
        };

        Ok(DailyHoroscope {
            date: title_case(&entry.label),
            horoscope_data: entry.body,
        })
    }

    pub async fn weekly(
        &self,
        sign: &str,
        now: NaiveDateTime,
    ) -> Result<WeeklyHoroscope, HoroscopeError> {
        let sign: ZodiacSign = sign.parse()?;
        let current = period::current_week_range(now);

        let entry = match self.lookup(Period::Weekly, sign, &current).await? {
            Some(entry) => entry,
            None => {
                let html = self.client.fetch_weekly(sign).await?;
                let fields = extractor::parse_weekly(&html)?;
                if !fields.week.eq_ignore_ascii_case(&current) {
                    warn!(
                        sign = %sign,
                        scraped = %fields.week,
                        expected = %current,
                        "Upstream week label differs from the current week"
                    );
                }
                let entry = HoroscopeEntry::new(
                    sign,
                    Period::Weekly,
                    fields.week.clone(),
                    fields.week,
                    fields.body,
                );
                self.store(entry).await?
            }
        };

        Ok(WeeklyHoroscope {
            week: title_case(&entry.label),
            horoscope_data: entry.body,
        })
    }

    pub async fn monthly(
        &self,
        sign: &str,
        now: NaiveDateTime,
    ) -> Result<MonthlyHoroscope, HoroscopeError> {
        let sign: ZodiacSign = sign.parse()?;
        let current = period::current_month(now);

        let entry = match self.lookup(Period::Monthly, sign, &current).await? {
            Some(entry) => entry,
            None => {
                let html = self.client.fetch_monthly(sign).await?;
                let fields = extractor::parse_monthly(&html)?;
                let entry = HoroscopeEntry::new(
                    sign,
                    Period::Monthly,
                    fields.month.clone(),
                    fields.month,
                    fields.body,
                )
                .with_days(fields.standout_days, fields.challenging_days);
                self.store(entry).await?
            }
        };

        Ok(MonthlyHoroscope {
            month: title_case(&entry.label),
            horoscope_data: entry.body,
            standout_days: entry.standout_days,
            challenging_days: entry.challenging_days,
        })
    }

    pub async fn purge_expired(&self) -> Result<PurgeReport, HoroscopeError> {
        let report = self.cache.purge_expired(chrono::Utc::now()).await?;
        info!(
            daily = report.daily,
            weekly = report.weekly,
            monthly = report.monthly,
            "Purged expired horoscope entries"
        );
        Ok(report)
    }

    async fn lookup(
        &self,
        period: Period,
        sign: ZodiacSign,
        period_key: &str,
    ) -> Result<Option<HoroscopeEntry>, HoroscopeError> {
        let hit = self.cache.get(period, sign, period_key).await?;

        if hit.is_some() {
            debug!(sign = %sign, period = %period, key = %period_key, "Cache hit");
            metrics::counter!("horoscope_cache_hits_total", "period" => period.as_str())
                .increment(1);
        } else {
            debug!(sign = %sign, period = %period, key = %period_key, "Cache miss, scraping upstream");
            metrics::counter!("horoscope_cache_misses_total", "period" => period.as_str())
                .increment(1);
            metrics::counter!("horoscope_upstream_requests_total", "period" => period.as_str())
                .increment(1);
        }

        Ok(hit)
    }

    async fn store(&self, entry: HoroscopeEntry) -> Result<HoroscopeEntry, HoroscopeError> {
        self.cache.put(&entry).await?;
        info!(
            sign = %entry.sign,
            period = %entry.period,
            key = %entry.period_key,
            "Cached fresh horoscope"
        );
        Ok(entry)
    }
}
