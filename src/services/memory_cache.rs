use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{HoroscopeEntry, Period, ZodiacSign};
use crate::services::cache_service::{CacheError, HoroscopeCache, PurgeReport, normalized};

#[derive(Default)]
struct Tables {
    daily: HashMap<(ZodiacSign, String), HoroscopeEntry>,
    weekly: HashMap<ZodiacSign, HoroscopeEntry>,
    monthly: HashMap<ZodiacSign, HoroscopeEntry>,
}

/// Process-local [`HoroscopeCache`]. All three tables sit behind one lock.
#[derive(Default)]
pub struct MemoryHoroscopeCache {
    tables: RwLock<Tables>,
}

impl MemoryHoroscopeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let tables = self.tables.read().await;
        tables.daily.len() + tables.weekly.len() + tables.monthly.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl HoroscopeCache for MemoryHoroscopeCache {
    async fn get(
        &self,
        period: Period,
        sign: ZodiacSign,
        period_key: &str,
    ) -> Result<Option<HoroscopeEntry>, CacheError> {
        let wanted = period_key.to_lowercase();
        let tables = self.tables.read().await;

        let entry = match period {
            Period::Daily => tables.daily.get(&(sign, wanted.clone())),
            Period::Weekly => tables.weekly.get(&sign),
            Period::Monthly => tables.monthly.get(&sign),
        };

        Ok(entry.filter(|e| e.period_key == wanted).cloned())
    }

    async fn put(&self, entry: &HoroscopeEntry) -> Result<(), CacheError> {
        let entry = normalized(entry);
        let mut tables = self.tables.write().await;

        match entry.period {
            Period::Daily => {
                tables
                    .daily
                    .insert((entry.sign, entry.period_key.clone()), entry);
            }
            Period::Weekly => {
                tables.weekly.insert(entry.sign, entry);
            }
            Period::Monthly => {
                tables.monthly.insert(entry.sign, entry);
            }
        }

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeReport, CacheError> {
        let mut tables = self.tables.write().await;

        let before = (tables.daily.len(), tables.weekly.len(), tables.monthly.len());
        tables.daily.retain(|_, e| !e.is_expired(now));
        tables.weekly.retain(|_, e| !e.is_expired(now));
        tables.monthly.retain(|_, e| !e.is_expired(now));

        Ok(PurgeReport {
            daily: (before.0 - tables.daily.len()) as u64,
            weekly: (before.1 - tables.weekly.len()) as u64,
            monthly: (before.2 - tables.monthly.len()) as u64,
        })
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
