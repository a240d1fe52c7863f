use async_trait::async_trait;
use catalyst_models::Regime;
use moka::future::Cache;

use crate::error::ClassifierError;

/// Coarse market-regime enrichment provider (spec.md §4.D). Defaults to
/// `Regime::Neutral` on a cache miss with no backing data, so a provider
/// outage degrades the multiplier to 1.0 rather than failing the item.
#[async_trait]
pub trait RegimeProvider: Send + Sync {
    async fn regime(&self) -> Result<Regime, ClassifierError>;

    fn multiplier(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Bull => 1.15,
            Regime::Bear => 0.85,
            Regime::HighVol => 1.2,
            Regime::Neutral => 1.0,
            Regime::Crash => 0.5,
        }
    }
}

/// Static regime provider backed by a short-TTL cache, refreshed by an
/// external classification routine (e.g. VIX/SPY breadth thresholds).
pub struct CachedRegimeProvider {
    cache: Cache<(), Regime>,
    fetch: Box<dyn Fn() -> Regime + Send + Sync>,
}

impl CachedRegimeProvider {
    pub fn new(ttl: std::time::Duration, fetch: Box<dyn Fn() -> Regime + Send + Sync>) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).build(),
            fetch,
        }
    }
}

#[async_trait]
impl RegimeProvider for CachedRegimeProvider {
    async fn regime(&self) -> Result<Regime, ClassifierError> {
        if let Some(cached) = self.cache.get(&()).await {
            return Ok(cached);
        }
        let value = (self.fetch)();
        self.cache.insert((), value).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_match_spec_ordering() {
        let provider = CachedRegimeProvider::new(
            std::time::Duration::from_secs(60),
            Box::new(|| Regime::Neutral),
        );
        assert!(provider.multiplier(Regime::Bull) > provider.multiplier(Regime::Neutral));
        assert!(provider.multiplier(Regime::Crash) < provider.multiplier(Regime::Bear));
    }

    #[tokio::test]
    async fn caches_fetch_result() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let provider = CachedRegimeProvider::new(
            std::time::Duration::from_secs(60),
            Box::new(move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Regime::Bull
            }),
        );
        provider.regime().await.unwrap();
        provider.regime().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
