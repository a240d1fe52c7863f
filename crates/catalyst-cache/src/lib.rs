pub mod cache;
pub mod chain;
pub mod disk;
pub mod error;
pub mod health;
pub mod memory;
pub mod prefetch;
pub mod providers;
pub mod rate_limit;

pub use cache::MarketDataCache;
pub use chain::ProviderChain;
pub use disk::DiskCache;
pub use error::CacheError;
pub use health::ProviderHealth;
pub use memory::MemoryCache;
pub use prefetch::PrefetchPool;
pub use providers::{stooq::StooqProvider, tiingo::TiingoProvider, yahoo::YahooProvider, MarketDataProvider, RateLimitSpec};
pub use rate_limit::ProviderRateLimiter;
