use std::collections::HashMap;
use std::sync::Mutex;

use catalyst_models::{Bar, Interval};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::CacheError;
use crate::health::ProviderHealth;
use crate::providers::MarketDataProvider;
use crate::rate_limit::ProviderRateLimiter;

struct ChainMember {
    provider: Box<dyn MarketDataProvider>,
    limiter: ProviderRateLimiter,
}

/// Ordered fallback chain of market-data providers. Attempts each provider
/// in priority order, skipping ones currently in a health cooldown, and
/// falls through to the next on any error (spec.md §4.C "falls back through
/// configured providers in order").
pub struct ProviderChain {
    members: Vec<ChainMember>,
    health: Mutex<HashMap<&'static str, ProviderHealth>>,
    error_counts: Mutex<HashMap<&'static str, u64>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn MarketDataProvider>>) -> Self {
        let mut health = HashMap::new();
        let members = providers
            .into_iter()
            .map(|provider| {
                health.insert(provider.name(), ProviderHealth::new());
                let limiter = ProviderRateLimiter::from_spec(provider.rate_limit_spec());
                ChainMember { provider, limiter }
            })
            .collect();
        Self {
            members,
            health: Mutex::new(health),
            error_counts: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError> {
        for member in &self.members {
            let name = member.provider.name();
            let available = self
                .health
                .lock()
                .unwrap()
                .get(name)
                .map(ProviderHealth::is_available)
                .unwrap_or(true);
            if !available {
                continue;
            }

            member.limiter.acquire().await;
            match member.provider.fetch_bars(symbol, interval, since, until).await {
                Ok(bars) => {
                    self.health.lock().unwrap().get_mut(name).unwrap().record_success();
                    return Ok(bars);
                }
                Err(err) => {
                    warn!(provider = name, %symbol, error = %err, "provider fetch failed, falling back");
                    self.health.lock().unwrap().get_mut(name).unwrap().record_failure();
                    *self.error_counts.lock().unwrap().entry(name).or_insert(0) += 1;
                }
            }
        }
        Err(CacheError::AllProvidersExhausted {
            symbol: symbol.to_string(),
            interval: interval.as_str().to_string(),
        })
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.provider.name()).collect()
    }

    /// Drains and returns cumulative per-provider fetch error counts since
    /// the last call, for surfacing via the heartbeat (spec.md §4.K).
    pub fn take_error_counts(&self) -> HashMap<String, u64> {
        let mut counts = self.error_counts.lock().unwrap();
        std::mem::take(&mut *counts)
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::providers::RateLimitSpec;

    struct FlakyProvider {
        name: &'static str,
        fail_count: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MarketDataProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn rate_limit_spec(&self) -> RateLimitSpec {
            RateLimitSpec {
                requests_per_second: 100,
                burst: 100,
            }
        }

        async fn fetch_bars(
            &self,
            _symbol: &str,
            _interval: Interval,
            _since: DateTime<Utc>,
            _until: DateTime<Utc>,
        ) -> Result<Vec<Bar>, CacheError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_count.load(Ordering::SeqCst) > 0 {
                self.fail_count.fetch_sub(1, Ordering::SeqCst);
                Err(CacheError::Provider("forced failure".to_string()))
            } else {
                Ok(vec![Bar {
                    ts_utc: Utc::now(),
                    open: dec!(1.0),
                    high: dec!(1.0),
                    low: dec!(1.0),
                    close: dec!(1.0),
                    volume: 1,
                }])
            }
        }
    }

    #[tokio::test]
    async fn falls_through_to_next_provider_on_failure() {
        let primary = Box::new(FlakyProvider {
            name: "primary",
            fail_count: Arc::new(AtomicUsize::new(1)),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let backup = Box::new(FlakyProvider {
            name: "backup",
            fail_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let chain = ProviderChain::new(vec![primary, backup]);
        let bars = chain
            .fetch_bars("XYZ", Interval::OneDay, Utc::now(), Utc::now())
            .await
            .unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[tokio::test]
    async fn returns_error_when_all_providers_fail() {
        let primary = Box::new(FlakyProvider {
            name: "primary",
            fail_count: Arc::new(AtomicUsize::new(10)),
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let chain = ProviderChain::new(vec![primary]);
        let result = chain
            .fetch_bars("XYZ", Interval::OneDay, Utc::now(), Utc::now())
            .await;
        assert!(matches!(result, Err(CacheError::AllProvidersExhausted { .. })));
    }
}
