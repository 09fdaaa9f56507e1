pub mod horoscope;
