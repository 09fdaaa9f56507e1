use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{daily_horoscope, monthly_horoscope, weekly_horoscope};

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `sqlite::memory:` opens its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections.max(1), min_connections.min(max_connections))
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Recycling the only in-memory connection would drop the database.
        let (idle, lifetime) = if in_memory {
            (Duration::from_secs(365 * 86_400), Duration::from_secs(365 * 86_400))
        } else {
            (Duration::from_secs(300), Duration::from_secs(600))
        };
        opt.idle_timeout(idle).max_lifetime(lifetime);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn horoscope_repo(&self) -> repositories::horoscope::HoroscopeRepository {
        repositories::horoscope::HoroscopeRepository::new(self.conn.clone())
    }

    pub async fn get_daily_horoscope(
        &self,
        sign: &str,
        day: &str,
    ) -> Result<Option<daily_horoscope::Model>> {
        self.horoscope_repo().get_daily(sign, day).await
    }

    pub async fn save_daily_horoscope(&self, row: daily_horoscope::Model) -> Result<()> {
        self.horoscope_repo().save_daily(row).await
    }

    pub async fn get_weekly_horoscope(&self, sign: &str) -> Result<Option<weekly_horoscope::Model>> {
        self.horoscope_repo().get_weekly(sign).await
    }

    pub async fn save_weekly_horoscope(&self, row: weekly_horoscope::Model) -> Result<()> {
        self.horoscope_repo().save_weekly(row).await
    }

    pub async fn get_monthly_horoscope(
        &self,
        sign: &str,
    ) -> Result<Option<monthly_horoscope::Model>> {
        self.horoscope_repo().get_monthly(sign).await
    }

    pub async fn save_monthly_horoscope(&self, row: monthly_horoscope::Model) -> Result<()> {
        self.horoscope_repo().save_monthly(row).await
    }

    pub async fn purge_daily_horoscopes(&self, threshold: &str) -> Result<u64> {
        self.horoscope_repo().purge_daily(threshold).await
    }

    pub async fn purge_weekly_horoscopes(&self, threshold: &str) -> Result<u64> {
        self.horoscope_repo().purge_weekly(threshold).await
    }

    pub async fn purge_monthly_horoscopes(&self, threshold: &str) -> Result<u64> {
        self.horoscope_repo().purge_monthly(threshold).await
    }
}
