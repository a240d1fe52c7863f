use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use governor::state::{InMemoryState, NotKeyed};
use governor::clock::DefaultClock;
use nonzero_ext::nonzero;

use crate::providers::RateLimitSpec;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-provider token bucket built from the provider's advertised
/// `RateLimitSpec` (spec.md §4.C, and the SEC EDGAR 10 req/s fair-access
/// policy in §4.E).
pub struct ProviderRateLimiter {
    limiter: Limiter,
}

impl ProviderRateLimiter {
    pub fn from_spec(spec: RateLimitSpec) -> Self {
        let rps = NonZeroU32::new(spec.requests_per_second.max(1)).unwrap_or(nonzero!(1u32));
        let burst = NonZeroU32::new(spec.burst.max(1)).unwrap_or(nonzero!(1u32));
        let quota = Quota::per_second(rps).allow_burst(burst);
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Blocks (cooperatively, via async sleep) until a request slot is
    /// available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_first_request_up_to_burst() {
        let limiter = ProviderRateLimiter::from_spec(RateLimitSpec {
            requests_per_second: 1,
            burst: 2,
        });
        assert!(limiter.check());
        assert!(limiter.check());
    }

    #[tokio::test]
    async fn acquire_eventually_resolves() {
        let limiter = ProviderRateLimiter::from_spec(RateLimitSpec {
            requests_per_second: 100,
            burst: 100,
        });
        limiter.acquire().await;
    }
}
