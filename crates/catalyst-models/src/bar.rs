use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported bar intervals for the market-data provider contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "15m")]
    FifteenMinute,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinute => "5m",
            Interval::FifteenMinute => "15m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
        }
    }

    /// TTL to apply to cached bars of this interval, per spec.md §4.C
    /// ("configured per interval: intraday 5 min, daily 1 h").
    pub fn default_ttl(&self) -> std::time::Duration {
        match self {
            Interval::OneDay => std::time::Duration::from_secs(3600),
            _ => std::time::Duration::from_secs(300),
        }
    }
}

/// A single OHLCV bar as returned by a market-data provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub ts_utc: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// Validate that a sequence of bars is strictly increasing in `ts_utc` with
/// no duplicate timestamps (P5 in spec.md §8).
pub fn bars_strictly_ordered(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].ts_utc < w[1].ts_utc)
}
