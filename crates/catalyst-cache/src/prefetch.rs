use std::sync::Arc;

use catalyst_models::Interval;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::cache::MarketDataCache;

/// Bounded background worker pool that warms the cache for symbols the
/// classifier is about to need, without starving interactive `price_at`/
/// `bars` lookups (spec.md §4.C "runs at lower scheduling priority than
/// interactive lookups").
pub struct PrefetchPool {
    semaphore: Arc<Semaphore>,
}

impl PrefetchPool {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Warms the cache for a batch of symbols at the given interval.
    /// Errors are swallowed (logged) since prefetch is best-effort.
    pub async fn warm(&self, cache: Arc<MarketDataCache>, symbols: Vec<String>, interval: Interval) {
        let mut set = tokio::task::JoinSet::new();
        for symbol in symbols {
            let semaphore = self.semaphore.clone();
            let cache = cache.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                if let Err(err) = cache.warm_symbol(&symbol, interval).await {
                    debug!(%symbol, error = %err, "prefetch failed");
                }
            });
        }
        while set.join_next().await.is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_enforces_minimum_of_one_permit() {
        let pool = PrefetchPool::new(0);
        assert_eq!(pool.semaphore.available_permits(), 1);
    }

    #[test]
    fn pool_respects_configured_concurrency() {
        let pool = PrefetchPool::new(10);
        assert_eq!(pool.semaphore.available_permits(), 10);
    }
}
