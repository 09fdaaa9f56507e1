//! `SeaORM` implementation of [`HoroscopeCache`] over the SQLite [`Store`].
//!
//! Each lookup and each upsert is a single statement, so SQLite's statement
//! atomicity is what keeps readers from seeing a half-written row.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::db::Store;
use crate::entities::{daily_horoscope, monthly_horoscope, weekly_horoscope};
use crate::models::{HoroscopeEntry, Period, ZodiacSign};
use crate::services::cache_service::{
    CacheError, HoroscopeCache, PurgeReport, normalized, parse_timestamp, timestamp,
};

pub struct SeaOrmHoroscopeCache {
    store: Store,
}

impl SeaOrmHoroscopeCache {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn threshold(now: DateTime<Utc>, period: Period) -> String {
        timestamp(now - period.retention())
    }
}

fn from_daily(sign: ZodiacSign, row: daily_horoscope::Model) -> Result<HoroscopeEntry, CacheError> {
    Ok(HoroscopeEntry {
        sign,
        period: Period::Daily,
        period_key: row.day,
        label: row.date,
        body: row.data,
        standout_days: String::new(),
        challenging_days: String::new(),
        fetched_at: parse_timestamp(&row.last_updated)?,
    })
}

fn from_weekly(
    sign: ZodiacSign,
    row: weekly_horoscope::Model,
) -> Result<HoroscopeEntry, CacheError> {
    Ok(HoroscopeEntry {
        sign,
        period: Period::Weekly,
        period_key: row.week.clone(),
        label: row.week,
        body: row.data,
        standout_days: String::new(),
        challenging_days: String::new(),
        fetched_at: parse_timestamp(&row.last_updated)?,
    })
}

fn from_monthly(
    sign: ZodiacSign,
    row: monthly_horoscope::Model,
) -> Result<HoroscopeEntry, CacheError> {
    Ok(HoroscopeEntry {
        sign,
        period: Period::Monthly,
        period_key: row.month.clone(),
        label: row.month,
        body: row.data,
        standout_days: row.standout_days,
        challenging_days: row.challenging_days,
        fetched_at: parse_timestamp(&row.last_updated)?,
    })
}

#[async_trait::async_trait]
impl HoroscopeCache for SeaOrmHoroscopeCache {
    async fn get(
        &self,
        period: Period,
        sign: ZodiacSign,
        period_key: &str,
    ) -> Result<Option<HoroscopeEntry>, CacheError> {
        let sign_key = sign.key();
        let wanted = period_key.to_lowercase();

        let entry = match period {
            Period::Daily => self
                .store
                .get_daily_horoscope(&sign_key, &wanted)
                .await?
                .map(|row| from_daily(sign, row))
                .transpose()?,
            Period::Weekly => self
                .store
                .get_weekly_horoscope(&sign_key)
                .await?
                .map(|row| from_weekly(sign, row))
                .transpose()?,
            Period::Monthly => self
                .store
                .get_monthly_horoscope(&sign_key)
                .await?
                .map(|row| from_monthly(sign, row))
                .transpose()?,
        };

        Ok(entry.filter(|e| {
            let current = e.period_key.to_lowercase() == wanted;
            if !current {
                debug!(
                    sign = %sign,
                    period = %period,
                    stored = %e.period_key,
                    wanted = %wanted,
                    "Cached row belongs to a past period"
                );
            }
            current
        }))
    }

    async fn put(&self, entry: &HoroscopeEntry) -> Result<(), CacheError> {
        let entry = normalized(entry);
        let sign = entry.sign.key();
        let last_updated = timestamp(entry.fetched_at);

        match entry.period {
            Period::Daily => {
                self.store
                    .save_daily_horoscope(daily_horoscope::Model {
                        sign,
                        day: entry.period_key,
                        date: entry.label,
                        data: entry.body,
                        last_updated,
                    })
                    .await?;
            }
            Period::Weekly => {
                self.store
                    .save_weekly_horoscope(weekly_horoscope::Model {
                        sign,
                        week: entry.period_key,
                        data: entry.body,
                        last_updated,
                    })
                    .await?;
            }
            Period::Monthly => {
                self.store
                    .save_monthly_horoscope(monthly_horoscope::Model {
                        sign,
                        month: entry.period_key,
                        data: entry.body,
                        standout_days: entry.standout_days,
                        challenging_days: entry.challenging_days,
                        last_updated,
                    })
                    .await?;
            }
        }

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeReport, CacheError> {
        Ok(PurgeReport {
            daily: self
                .store
                .purge_daily_horoscopes(&Self::threshold(now, Period::Daily))
                .await?,
            weekly: self
                .store
                .purge_weekly_horoscopes(&Self::threshold(now, Period::Weekly))
                .await?,
            monthly: self
                .store
                .purge_monthly_horoscopes(&Self::threshold(now, Period::Monthly))
                .await?,
        })
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(self.store.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    async fn cache() -> SeaOrmHoroscopeCache {
        let store = Store::new("sqlite::memory:").await.unwrap();
        SeaOrmHoroscopeCache::new(store)
    }

    #[tokio::test]
    async fn test_daily_round_trip() {
        let cache = cache().await;
        let entry = HoroscopeEntry::new(
            ZodiacSign::Aries,
            Period::Daily,
            "2024-05-01",
            "May 1, 2024",
            "A great day for new beginnings.",
        );
        cache.put(&entry).await.unwrap();

        let hit = cache
            .get(Period::Daily, ZodiacSign::Aries, "2024-05-01")
            .await
            .unwrap()
            .expect("entry should be cached");
        assert_eq!(hit.body, "A great day for new beginnings.");
        assert_eq!(hit.label, "may 1, 2024");

        assert!(
            cache
                .get(Period::Daily, ZodiacSign::Aries, "2024-05-02")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            cache
                .get(Period::Daily, ZodiacSign::Taurus, "2024-05-01")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_weekly_stale_period_is_miss() {
        let cache = cache().await;
        let last_week = "Apr 22, 2024 - Apr 28, 2024";
        let this_week = "Apr 29, 2024 - May 5, 2024";

        cache
            .put(&HoroscopeEntry::new(
                ZodiacSign::Leo,
                Period::Weekly,
                last_week,
                last_week,
                "old",
            ))
            .await
            .unwrap();

        assert!(
            cache
                .get(Period::Weekly, ZodiacSign::Leo, this_week)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            cache
                .get(Period::Weekly, ZodiacSign::Leo, last_week)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_monthly_replaces_row_per_sign() {
        let cache = cache().await;
        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Virgo, Period::Monthly, "April 2024", "April 2024", "old")
                    .with_days("1, 2", "3"),
            )
            .await
            .unwrap();
        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Virgo, Period::Monthly, "May 2024", "May 2024", "new")
                    .with_days("9", ""),
            )
            .await
            .unwrap();

        assert!(
            cache
                .get(Period::Monthly, ZodiacSign::Virgo, "april 2024")
                .await
                .unwrap()
                .is_none()
        );
        let hit = cache
            .get(Period::Monthly, ZodiacSign::Virgo, "MAY 2024")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.body, "new");
        assert_eq!(hit.standout_days, "9");
        assert_eq!(hit.challenging_days, "");
    }

    #[tokio::test]
    async fn test_purge_respects_retention() {
        let cache = cache().await;
        let now = Utc::now();

        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Aries, Period::Daily, "2024-05-01", "d", "old")
                    .fetched_at(now - Duration::days(3)),
            )
            .await
            .unwrap();
        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Aries, Period::Daily, "2024-05-04", "d", "fresh")
                    .fetched_at(now - Duration::hours(1)),
            )
            .await
            .unwrap();
        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Aries, Period::Weekly, "w", "w", "kept")
                    .fetched_at(now - Duration::days(3)),
            )
            .await
            .unwrap();

        let report = cache.purge_expired(now).await.unwrap();
        assert_eq!(
            report,
            PurgeReport {
                daily: 1,
                weekly: 0,
                monthly: 0
            }
        );
        assert!(
            cache
                .get(Period::Daily, ZodiacSign::Aries, "2024-05-04")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            cache
                .get(Period::Weekly, ZodiacSign::Aries, "w")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_whole_entries() {
        let cache = Arc::new(cache().await);
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let body = format!("body-{i}");
                let entry =
                    HoroscopeEntry::new(ZodiacSign::Scorpio, Period::Monthly, "May 2024", "May 2024", body)
                        .with_days(format!("{i}"), format!("{i}"));
                cache.put(&entry).await.unwrap();
                cache
                    .get(Period::Monthly, ZodiacSign::Scorpio, "may 2024")
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            let seen = handle.await.unwrap().unwrap();
            let n = seen.body.trim_start_matches("body-");
            assert_eq!(seen.standout_days, n);
            assert_eq!(seen.challenging_days, n);
        }
    }
}
