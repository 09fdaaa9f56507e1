pub mod horoscope;
pub mod sign;

pub use horoscope::{DailyHoroscope, HoroscopeEntry, MonthlyHoroscope, Period, WeeklyHoroscope};
pub use sign::{UnknownSign, ZodiacSign};
