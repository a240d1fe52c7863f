pub mod stooq;
pub mod tiingo;
pub mod yahoo;

use async_trait::async_trait;
use catalyst_models::{Bar, Interval};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::CacheError;

/// A provider's advertised rate-limit contract, used to size its
/// `governor` token bucket (spec.md §4.C "respects per-provider rate
/// limits").
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSpec {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// One concrete market-data source. Providers never see the cache tiers;
/// they only know how to fetch bars over HTTP for a single symbol/interval.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn rate_limit_spec(&self) -> RateLimitSpec;

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError>;

    async fn last_price(&self, symbol: &str) -> Result<Decimal, CacheError> {
        let until = Utc::now();
        let since = until - chrono::Duration::days(1);
        let bars = self.fetch_bars(symbol, Interval::OneDay, since, until).await?;
        bars.last()
            .map(|b| b.close)
            .ok_or_else(|| CacheError::InvalidData(format!("no bars returned for {symbol}")))
    }
}
