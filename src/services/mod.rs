pub mod cache_service;
pub mod cache_service_impl;
pub use cache_service::{CacheError, HoroscopeCache, PurgeReport};
pub use cache_service_impl::SeaOrmHoroscopeCache;

pub mod memory_cache;
pub use memory_cache::MemoryHoroscopeCache;

pub mod horoscope_service;
pub use horoscope_service::{HoroscopeError, HoroscopeService};

pub mod period;

pub mod scheduler;
pub use scheduler::Scheduler;
