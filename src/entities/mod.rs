pub mod prelude;

pub mod daily_horoscope;
pub mod monthly_horoscope;
pub mod weekly_horoscope;
