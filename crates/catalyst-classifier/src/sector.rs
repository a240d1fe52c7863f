use async_trait::async_trait;
use moka::future::Cache;

use crate::error::ClassifierError;

/// Sector/industry enrichment provider (spec.md §4.D). Used to weight
/// source_weight for sector-sensitive keyword phrases (e.g. biotech trial
/// language weighted differently than mining drill results).
#[async_trait]
pub trait SectorProvider: Send + Sync {
    async fn sector(&self, ticker: &str) -> Result<Option<String>, ClassifierError>;
}

pub struct CachedSectorProvider<F> {
    cache: Cache<String, Option<String>>,
    fetch: F,
}

impl<F> CachedSectorProvider<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(ttl: std::time::Duration, fetch: F) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).max_capacity(10_000).build(),
            fetch,
        }
    }
}

#[async_trait]
impl<F> SectorProvider for CachedSectorProvider<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    async fn sector(&self, ticker: &str) -> Result<Option<String>, ClassifierError> {
        if let Some(cached) = self.cache.get(ticker).await {
            return Ok(cached);
        }
        let value = (self.fetch)(ticker);
        self.cache.insert(ticker.to_string(), value.clone()).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_ticker_resolves_to_none_without_erroring() {
        let provider = CachedSectorProvider::new(std::time::Duration::from_secs(60), |_| None);
        assert_eq!(provider.sector("ZZZZ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn known_ticker_returns_sector() {
        let provider = CachedSectorProvider::new(std::time::Duration::from_secs(60), |t| {
            (t == "XYZ").then(|| "biotechnology".to_string())
        });
        assert_eq!(
            provider.sector("XYZ").await.unwrap(),
            Some("biotechnology".to_string())
        );
    }
}
