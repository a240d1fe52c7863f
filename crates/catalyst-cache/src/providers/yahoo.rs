use async_trait::async_trait;
use catalyst_models::{Bar, Interval};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CacheError;
use crate::providers::{MarketDataProvider, RateLimitSpec};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Vec<Option<Decimal>>,
    high: Vec<Option<Decimal>>,
    low: Vec<Option<Decimal>>,
    close: Vec<Option<Decimal>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance chart API, used as a free fallback when Tiingo is
/// unavailable or rate-limited.
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn chart_interval(interval: Interval) -> &'static str {
        match interval {
            Interval::OneMinute => "1m",
            Interval::FiveMinute => "5m",
            Interval::FifteenMinute => "15m",
            Interval::OneHour => "60m",
            Interval::OneDay => "1d",
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn rate_limit_spec(&self) -> RateLimitSpec {
        RateLimitSpec {
            requests_per_second: 2,
            burst: 4,
        }
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", since.timestamp().to_string()),
                ("period2", until.timestamp().to_string()),
                ("interval", Self::chart_interval(interval).to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CacheError::Provider(format!(
                "yahoo returned {} for {symbol}",
                response.status()
            )));
        }

        let parsed: ChartResponse = response.json().await?;
        let result = parsed
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or_else(|| CacheError::InvalidData(format!("empty chart result for {symbol}")))?;
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| CacheError::InvalidData(format!("no quote series for {symbol}")))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.into_iter().enumerate() {
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
            ) else {
                continue;
            };
            bars.push(Bar {
                ts_utc: Utc.timestamp_opt(ts, 0).single().unwrap_or_else(Utc::now),
                open,
                high,
                low,
                close,
                volume,
            });
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_interval_maps_all_intervals() {
        assert_eq!(YahooProvider::chart_interval(Interval::OneHour), "60m");
        assert_eq!(YahooProvider::chart_interval(Interval::OneDay), "1d");
    }

    #[test]
    fn name_and_rate_limit_are_stable() {
        let provider = YahooProvider::with_base_url("https://example.invalid");
        assert_eq!(provider.name(), "yahoo");
        assert_eq!(provider.rate_limit_spec().burst, 4);
    }
}
