use crate::entities::{daily_horoscope, monthly_horoscope, prelude::*, weekly_horoscope};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub struct HoroscopeRepository {
    conn: DatabaseConnection,
}

impl HoroscopeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_daily(&self, sign: &str, day: &str) -> Result<Option<daily_horoscope::Model>> {
        let row = DailyHoroscope::find_by_id((sign.to_string(), day.to_string()))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    pub async fn get_weekly(&self, sign: &str) -> Result<Option<weekly_horoscope::Model>> {
        Ok(WeeklyHoroscope::find_by_id(sign.to_string())
            .one(&self.conn)
            .await?)
    }

    pub async fn get_monthly(&self, sign: &str) -> Result<Option<monthly_horoscope::Model>> {
        Ok(MonthlyHoroscope::find_by_id(sign.to_string())
            .one(&self.conn)
            .await?)
    }

    pub async fn save_daily(&self, row: daily_horoscope::Model) -> Result<()> {
        let active_model = daily_horoscope::ActiveModel {
            sign: Set(row.sign),
            day: Set(row.day),
            date: Set(row.date),
            data: Set(row.data),
            last_updated: Set(row.last_updated),
        };

        DailyHoroscope::insert(active_model)
            .on_conflict(
                OnConflict::columns([daily_horoscope::Column::Sign, daily_horoscope::Column::Day])
                    .update_columns([
                        daily_horoscope::Column::Date,
                        daily_horoscope::Column::Data,
                        daily_horoscope::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn save_weekly(&self, row: weekly_horoscope::Model) -> Result<()> {
        let active_model = weekly_horoscope::ActiveModel {
            sign: Set(row.sign),
            week: Set(row.week),
            data: Set(row.data),
            last_updated: Set(row.last_updated),
        };

        WeeklyHoroscope::insert(active_model)
            .on_conflict(
                OnConflict::column(weekly_horoscope::Column::Sign)
                    .update_columns([
                        weekly_horoscope::Column::Week,
                        weekly_horoscope::Column::Data,
                        weekly_horoscope::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn save_monthly(&self, row: monthly_horoscope::Model) -> Result<()> {
        let active_model = monthly_horoscope::ActiveModel {
            sign: Set(row.sign),
            month: Set(row.month),
            data: Set(row.data),
            standout_days: Set(row.standout_days),
            challenging_days: Set(row.challenging_days),
            last_updated: Set(row.last_updated),
        };

        MonthlyHoroscope::insert(active_model)
            .on_conflict(
                OnConflict::column(monthly_horoscope::Column::Sign)
                    .update_columns([
                        monthly_horoscope::Column::Month,
                        monthly_horoscope::Column::Data,
                        monthly_horoscope::Column::StandoutDays,
                        monthly_horoscope::Column::ChallengingDays,
                        monthly_horoscope::Column::LastUpdated,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// Deletes rows last written before `threshold` (an RFC 3339 UTC timestamp).
    pub async fn purge_daily(&self, threshold: &str) -> Result<u64> {
        let res = DailyHoroscope::delete_many()
            .filter(daily_horoscope::Column::LastUpdated.lt(threshold))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn purge_weekly(&self, threshold: &str) -> Result<u64> {
        let res = WeeklyHoroscope::delete_many()
            .filter(weekly_horoscope::Column::LastUpdated.lt(threshold))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn purge_monthly(&self, threshold: &str) -> Result<u64> {
        let res = MonthlyHoroscope::delete_many()
            .filter(monthly_horoscope::Column::LastUpdated.lt(threshold))
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected)
    }
}
