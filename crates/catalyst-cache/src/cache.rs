use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use catalyst_models::{Bar, Interval};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::chain::ProviderChain;
use crate::disk::DiskCache;
use crate::error::CacheError;
use crate::memory::MemoryCache;

fn query_key(symbol: &str, interval: Interval, since: DateTime<Utc>, until: DateTime<Utc>) -> String {
    format!(
        "{}:{}:{}:{}",
        symbol.to_uppercase(),
        interval.as_str(),
        since.timestamp(),
        until.timestamp()
    )
}

/// Read-through, two-tier market-data cache in front of a provider chain:
/// in-memory (moka) first, then disk, then the live providers in order,
/// promoting hits back up on the way out (spec.md §4.C).
pub struct MarketDataCache {
    memory: MemoryCache,
    disk: DiskCache,
    chain: ProviderChain,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MarketDataCache {
    pub fn new(memory: MemoryCache, disk: DiskCache, chain: ProviderChain) -> Self {
        Self {
            memory,
            disk,
            chain,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn bars(
        &self,
        symbol: &str,
        interval: Interval,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError> {
        let key = query_key(symbol, interval, since, until);

        if let Some(bars) = self.memory.get(&key).await {
            debug!(%symbol, tier = "memory", "cache hit");
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(bars);
        }

        if let Some(bars) = self.disk.get(&key)? {
            debug!(%symbol, tier = "disk", "cache hit");
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.memory.insert(key.clone(), bars.clone(), interval.default_ttl()).await;
            return Ok(bars);
        }

        debug!(%symbol, tier = "provider", "cache miss, fetching live");
        self.misses.fetch_add(1, Ordering::Relaxed);
        let bars = self.chain.fetch_bars(symbol, interval, since, until).await?;
        self.disk.insert(&key, &bars, interval.default_ttl())?;
        self.memory.insert(key, bars.clone(), interval.default_ttl()).await;
        Ok(bars)
    }

    pub async fn price_at(&self, symbol: &str, at: DateTime<Utc>) -> Result<Decimal, CacheError> {
        let since = at - chrono::Duration::days(1);
        let bars = self.bars(symbol, Interval::OneDay, since, at).await?;
        bars.last()
            .map(|b| b.close)
            .ok_or_else(|| CacheError::InvalidData(format!("no price available for {symbol}")))
    }

    /// Drains and returns cumulative (hits, misses) across both cache tiers
    /// since the last call, for surfacing via the heartbeat (spec.md §4.K).
    pub fn take_cache_counts(&self) -> (u64, u64) {
        (self.hits.swap(0, Ordering::Relaxed), self.misses.swap(0, Ordering::Relaxed))
    }

    pub fn take_provider_error_counts(&self) -> HashMap<String, u64> {
        self.chain.take_error_counts()
    }

    pub async fn warm_symbol(&self, symbol: &str, interval: Interval) -> Result<(), CacheError> {
        let until = Utc::now();
        let since = until - chrono::Duration::days(5);
        self.bars(symbol, interval, since, until).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_key_is_symbol_and_interval_sensitive() {
        let t1 = Utc::now();
        let t2 = t1 + chrono::Duration::hours(1);
        let a = query_key("xyz", Interval::OneDay, t1, t2);
        let b = query_key("XYZ", Interval::OneDay, t1, t2);
        assert_eq!(a, b, "symbol casing should normalize");

        let c = query_key("XYZ", Interval::OneMinute, t1, t2);
        assert_ne!(a, c);
    }
}
