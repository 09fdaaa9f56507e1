pub use super::daily_horoscope::Entity as DailyHoroscope;
pub use super::monthly_horoscope::Entity as MonthlyHoroscope;
pub use super::weekly_horoscope::Entity as WeeklyHoroscope;
