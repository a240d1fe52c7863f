use async_trait::async_trait;
use catalyst_models::RawItem;
use chrono::{DateTime, Utc};

use crate::error::FeedError;

/// One inbound feed source. Fetchers are pure I/O adapters: they know how
/// to turn a wire format into `RawItem`s but never see dedup, caching, or
/// classification (spec.md §4.E).
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    fn source_id(&self) -> String;

    async fn fetch(&self, since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError>;
}

/// Helper wiring a provider-agnostic timeout around any fetcher's `fetch`
/// call, so the registry doesn't need to special-case implementations.
pub async fn fetch_with_timeout(
    fetcher: &dyn FeedFetcher,
    since: DateTime<Utc>,
    timeout: std::time::Duration,
) -> Result<Vec<RawItem>, FeedError> {
    match tokio::time::timeout(timeout, fetcher.fetch(since)).await {
        Ok(result) => result,
        Err(_) => Err(FeedError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowFetcher;

    #[async_trait]
    impl FeedFetcher for SlowFetcher {
        fn source_id(&self) -> String {
            "slow".to_string()
        }

        async fn fetch(&self, _since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError> {
            tokio::time::sleep(std::time::Duration::from_secs(10)).await;
            Ok(vec![])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_before_slow_fetch_completes() {
        let fetcher = SlowFetcher;
        let result = fetch_with_timeout(&fetcher, Utc::now(), std::time::Duration::from_secs(1)).await;
        assert!(matches!(result, Err(FeedError::Timeout(_))));
    }
}
