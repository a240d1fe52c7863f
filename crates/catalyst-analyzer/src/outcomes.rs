use catalyst_cache::MarketDataCache;
use catalyst_models::{
    AnalyzerConfig, Bar, Outcome, RejectedRecord, Timeframe, MISSED_OPPORTUNITY_RETURN_THRESHOLD,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::AnalyzerError;

const MIN_TRADEABLE_VOLUME: u64 = 100_000;
const MAX_TRADEABLE_SPREAD_PCT: f64 = 0.05;

/// Computes realized return/drawdown over every `Timeframe` for one
/// rejected item (spec.md §4.J). The tradeability check (step 4) is
/// config-gated: when disabled, or when it fails, the bar's `Outcome` is
/// still emitted so the mining step's `not_missed` denominator isn't
/// silently shrunk — only `is_missed_opportunity` is affected.
pub async fn compute_outcomes(
    cache: &MarketDataCache,
    record: &RejectedRecord,
    ticker: &str,
    config: &AnalyzerConfig,
) -> Result<Vec<Outcome>, AnalyzerError> {
    let entry_price = cache.price_at(ticker, record.rejected_at).await?;
    let mut outcomes = Vec::new();

    for timeframe in Timeframe::ALL {
        let until = record.rejected_at + timeframe.duration();
        let since = record.rejected_at;
        let bars = cache.bars(ticker, catalyst_models::Interval::OneDay, since, until).await?;

        let tradeable = !config.tradeability_enabled || is_tradeable(&bars, entry_price);
        let (max_return, drawdown, exit_price, volume_at_entry) = summarize(&bars, entry_price);
        outcomes.push(Outcome {
            source_id: record.source_id.clone(),
            canonical_id: record.canonical_id.clone(),
            ticker: ticker.to_string(),
            timeframe,
            entry_price,
            exit_price,
            max_return,
            drawdown,
            volume_at_entry,
            is_missed_opportunity: tradeable && max_return >= MISSED_OPPORTUNITY_RETURN_THRESHOLD,
        });
    }

    Ok(outcomes)
}

fn is_tradeable(bars: &[Bar], entry_price: Decimal) -> bool {
    let Some(first) = bars.first() else {
        return false;
    };
    if first.volume < MIN_TRADEABLE_VOLUME {
        return false;
    }
    let entry = entry_price.to_f64().unwrap_or(0.0);
    let high = first.high.to_f64().unwrap_or(0.0);
    let low = first.low.to_f64().unwrap_or(0.0);
    let spread = (high - low).abs() / entry.max(f64::EPSILON);
    spread <= MAX_TRADEABLE_SPREAD_PCT
}

fn summarize(bars: &[Bar], entry_price: Decimal) -> (f64, f64, Decimal, u64) {
    let entry = entry_price.to_f64().unwrap_or(0.0);
    let mut max_price = entry;
    let mut min_price = entry;
    for bar in bars {
        max_price = max_price.max(bar.high.to_f64().unwrap_or(entry));
        min_price = min_price.min(bar.low.to_f64().unwrap_or(entry));
    }
    let max_return = (max_price - entry) / entry.max(f64::EPSILON);
    let drawdown = (entry - min_price) / entry.max(f64::EPSILON);
    let exit_price = bars.last().map(|b| b.close).unwrap_or(entry_price);
    let volume_at_entry = bars.first().map(|b| b.volume).unwrap_or(0);
    (max_return, drawdown, exit_price, volume_at_entry)
}
