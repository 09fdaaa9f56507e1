use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::CacheConfig;
use crate::services::HoroscopeService;

/// Runs the retention purge out of band from request handling.
pub struct Scheduler {
    service: HoroscopeService,
    config: CacheConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(service: HoroscopeService, config: CacheConfig) -> Self {
        Self {
            service,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.purge_enabled {
            info!("Cache purge is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting cache purge scheduler");

        if let Some(cron_expr) = &self.config.purge_cron {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    pub async fn run_once(&self) -> Result<()> {
        run_purge(&self.service).await;
        Ok(())
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let service = self.service.clone();
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let service = service.clone();
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_purge(&service).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Cache purge scheduled with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let hours = self.config.purge_interval_hours.max(1);
        info!("Cache purge running every {}h", hours);

        let mut purge_interval = interval(Duration::from_secs(u64::from(hours) * 60 * 60));

        loop {
            purge_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_purge(&self.service).await;
        }

        Ok(())
    }
}

async fn run_purge(service: &HoroscopeService) {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = "purge_cache", "Starting cache purge");

    match service.purge_expired().await {
        Ok(report) => {
            metrics::counter!("horoscope_cache_purged_total").increment(report.total());
            info!(
                event = "job_finished",
                job_name = "purge_cache",
                removed = report.total(),
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "Cache purge finished"
            );
        }
        Err(e) => {
            error!(event = "job_failed", job_name = "purge_cache", error = %e, "Cache purge failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::horoscope::HoroscopeClient;
    use crate::config::UpstreamConfig;
    use crate::models::{HoroscopeEntry, Period, ZodiacSign};
    use crate::services::cache_service::HoroscopeCache;
    use crate::services::memory_cache::MemoryHoroscopeCache;

    #[tokio::test]
    async fn test_run_once_purges() {
        let cache = Arc::new(MemoryHoroscopeCache::new());
        cache
            .put(
                &HoroscopeEntry::new(ZodiacSign::Aries, Period::Daily, "2024-05-01", "d", "x")
                    .fetched_at(chrono::Utc::now() - chrono::Duration::days(30)),
            )
            .await
            .unwrap();

        let client = HoroscopeClient::new(&UpstreamConfig::default()).unwrap();
        let service = HoroscopeService::new(cache.clone(), client);
        let scheduler = Scheduler::new(service, CacheConfig::default());

        scheduler.run_once().await.unwrap();
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_disabled_returns_immediately() {
        let client = HoroscopeClient::new(&UpstreamConfig::default()).unwrap();
        let service = HoroscopeService::new(Arc::new(MemoryHoroscopeCache::new()), client);
        let config = CacheConfig {
            purge_enabled: false,
            ..CacheConfig::default()
        };
        Scheduler::new(service, config).start().await.unwrap();
    }
}
