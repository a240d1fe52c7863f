use catalyst_cache::MarketDataCache;
use catalyst_models::Interval;
use chrono::Utc;

use crate::error::ClassifierError;

const RVOL_LOOKBACK_DAYS: i64 = 20;

/// Relative-volume enrichment: today's volume divided by the trailing
/// 20-day average (spec.md §4.D). Feeds `rvol_multiplier` in composition.
pub struct RvolProvider<'a> {
    cache: &'a MarketDataCache,
}

impl<'a> RvolProvider<'a> {
    pub fn new(cache: &'a MarketDataCache) -> Self {
        Self { cache }
    }

    pub async fn rvol(&self, ticker: &str) -> Result<f64, ClassifierError> {
        let until = Utc::now();
        let since = until - chrono::Duration::days(RVOL_LOOKBACK_DAYS + 1);
        let bars = self.cache.bars(ticker, Interval::OneDay, since, until).await?;
        if bars.len() < 2 {
            return Ok(1.0);
        }
        let (today, history) = bars.split_last().unwrap();
        let avg_history_volume: f64 =
            history.iter().map(|b| b.volume as f64).sum::<f64>() / history.len() as f64;
        if avg_history_volume <= 0.0 {
            return Ok(1.0);
        }
        Ok(today.volume as f64 / avg_history_volume)
    }

    /// Multiplier applied in composition (spec.md §4.D / §4.F step 4):
    /// elevated relative volume amplifies the score, muted volume dampens
    /// it, clamped to a sane band.
    pub fn multiplier(rvol: f64) -> f64 {
        (0.8 + 0.2 * rvol).clamp(0.8, 1.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_is_one_at_average_volume() {
        assert!((RvolProvider::multiplier(1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn multiplier_clamps_at_extremes() {
        assert_eq!(RvolProvider::multiplier(100.0), 1.4);
        assert_eq!(RvolProvider::multiplier(0.0), 0.8);
    }

    #[test]
    fn multiplier_is_monotonic_in_rvol() {
        assert!(RvolProvider::multiplier(2.0) > RvolProvider::multiplier(1.0));
    }
}
