use async_trait::async_trait;
use catalyst_models::{Bar, Interval};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CacheError;
use crate::providers::{MarketDataProvider, RateLimitSpec};

#[derive(Debug, Deserialize)]
struct TiingoBar {
    date: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: u64,
}

/// Tiingo IEX/EOD prices provider. Used as the primary source in the
/// default provider chain.
pub struct TiingoProvider {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl TiingoProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: "https://api.tiingo.com".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_token: api_token.into(),
            base_url: base_url.into(),
        }
    }

    fn resample_freq(interval: Interval) -> &'static str {
        match interval {
            Interval::OneMinute => "1min",
            Interval::FiveMinute => "5min",
            Interval::FifteenMinute => "15min",
            Interval::OneHour => "1hour",
            Interval::OneDay => "1day",
        }
    }
}

#[async_trait]
impl MarketDataProvider for TiingoProvider {
    fn name(&self) -> &'static str {
        "tiingo"
    }

    fn rate_limit_spec(&self) -> RateLimitSpec {
        RateLimitSpec {
            requests_per_second: 5,
            burst: 10,
        }
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError> {
        let url = format!("{}/iex/{}/prices", self.base_url, symbol.to_lowercase());
        let response = self
            .client
            .get(&url)
            .query(&[
                ("startDate", since.format("%Y-%m-%d").to_string()),
                ("endDate", until.format("%Y-%m-%d").to_string()),
                ("resampleFreq", Self::resample_freq(interval).to_string()),
                ("token", self.api_token.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CacheError::Provider(format!(
                "tiingo returned {} for {symbol}",
                response.status()
            )));
        }

        let raw: Vec<TiingoBar> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|b| Bar {
                ts_utc: b.date,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_freq_maps_all_intervals() {
        assert_eq!(TiingoProvider::resample_freq(Interval::OneMinute), "1min");
        assert_eq!(TiingoProvider::resample_freq(Interval::OneDay), "1day");
    }

    #[test]
    fn name_and_rate_limit_are_stable() {
        let provider = TiingoProvider::with_base_url("token", "https://example.invalid");
        assert_eq!(provider.name(), "tiingo");
        assert_eq!(provider.rate_limit_spec().requests_per_second, 5);
    }
}
