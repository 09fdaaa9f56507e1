use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyHoroscope::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DailyHoroscope::Sign).string().not_null())
                    .col(ColumnDef::new(DailyHoroscope::Day).string().not_null())
                    .col(ColumnDef::new(DailyHoroscope::Date).string().not_null())
                    .col(ColumnDef::new(DailyHoroscope::Data).text().not_null())
                    .col(
                        ColumnDef::new(DailyHoroscope::LastUpdated)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DailyHoroscope::Sign)
                            .col(DailyHoroscope::Day),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WeeklyHoroscope::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeeklyHoroscope::Sign)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WeeklyHoroscope::Week).string().not_null())
                    .col(ColumnDef::new(WeeklyHoroscope::Data).text().not_null())
                    .col(
                        ColumnDef::new(WeeklyHoroscope::LastUpdated)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyHoroscope::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyHoroscope::Sign)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyHoroscope::Month).string().not_null())
                    .col(ColumnDef::new(MonthlyHoroscope::Data).text().not_null())
                    .col(
                        ColumnDef::new(MonthlyHoroscope::StandoutDays)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MonthlyHoroscope::ChallengingDays)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(MonthlyHoroscope::LastUpdated)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_horoscope_last_updated")
                    .table(DailyHoroscope::Table)
                    .col(DailyHoroscope::LastUpdated)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyHoroscope::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WeeklyHoroscope::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyHoroscope::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailyHoroscope {
    Table,
    Sign,
    Day,
    Date,
    Data,
    LastUpdated,
}

#[derive(DeriveIden)]
enum WeeklyHoroscope {
    Table,
    Sign,
    Week,
    Data,
    LastUpdated,
}

#[derive(DeriveIden)]
enum MonthlyHoroscope {
    Table,
    Sign,
    Month,
    Data,
    StandoutDays,
    ChallengingDays,
    LastUpdated,
}
