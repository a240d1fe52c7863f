use async_trait::async_trait;
use catalyst_models::FloatClass;
use moka::future::Cache;

use crate::error::ClassifierError;

/// Share-float enrichment provider (spec.md §4.D): classifies a ticker's
/// public float into bands that feed `float_multiplier`.
#[async_trait]
pub trait FloatProvider: Send + Sync {
    async fn float_class(&self, ticker: &str) -> Result<FloatClass, ClassifierError>;
}

pub fn classify_float_shares(shares_outstanding: u64) -> FloatClass {
    match shares_outstanding {
        0..=10_000_000 => FloatClass::Micro,
        10_000_001..=50_000_000 => FloatClass::Low,
        50_000_001..=200_000_000 => FloatClass::Medium,
        _ => FloatClass::High,
    }
}

/// Smaller floats move more per dollar of buying pressure, so micro/low
/// float classes get an amplified multiplier (spec.md §4.F step 4).
pub fn float_multiplier(class: FloatClass) -> f64 {
    match class {
        FloatClass::Micro => 1.3,
        FloatClass::Low => 1.15,
        FloatClass::Medium => 1.0,
        FloatClass::High => 0.9,
    }
}

pub struct CachedFloatProvider<F> {
    cache: Cache<String, FloatClass>,
    fetch: F,
}

impl<F> CachedFloatProvider<F>
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    pub fn new(ttl: std::time::Duration, fetch: F) -> Self {
        Self {
            cache: Cache::builder().time_to_live(ttl).max_capacity(10_000).build(),
            fetch,
        }
    }
}

#[async_trait]
impl<F> FloatProvider for CachedFloatProvider<F>
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    async fn float_class(&self, ticker: &str) -> Result<FloatClass, ClassifierError> {
        if let Some(cached) = self.cache.get(ticker).await {
            return Ok(cached);
        }
        let shares = (self.fetch)(ticker);
        let class = classify_float_shares(shares);
        self.cache.insert(ticker.to_string(), class).await;
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bands_at_boundaries() {
        assert_eq!(classify_float_shares(1_000_000), FloatClass::Micro);
        assert_eq!(classify_float_shares(10_000_001), FloatClass::Low);
        assert_eq!(classify_float_shares(200_000_001), FloatClass::High);
    }

    #[test]
    fn smaller_float_gets_larger_multiplier() {
        assert!(float_multiplier(FloatClass::Micro) > float_multiplier(FloatClass::High));
    }

    #[tokio::test]
    async fn provider_caches_classification() {
        let provider = CachedFloatProvider::new(std::time::Duration::from_secs(60), |_| 5_000_000);
        assert_eq!(provider.float_class("XYZ").await.unwrap(), FloatClass::Micro);
    }
}
