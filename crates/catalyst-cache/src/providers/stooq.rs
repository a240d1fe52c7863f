use async_trait::async_trait;
use catalyst_models::{Bar, Interval};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::CacheError;
use crate::providers::{MarketDataProvider, RateLimitSpec};

/// Stooq's CSV daily-bars endpoint. Last-resort fallback: no key required,
/// daily granularity only, and used only when both Tiingo and Yahoo have
/// failed or cooled down.
pub struct StooqProvider {
    client: reqwest::Client,
    base_url: String,
}

impl StooqProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://stooq.com".to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn parse_csv(body: &str) -> Result<Vec<Bar>, CacheError> {
        let mut bars = Vec::new();
        for line in body.lines().skip(1) {
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 6 {
                continue;
            }
            let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
                .map_err(|e| CacheError::InvalidData(e.to_string()))?;
            let ts_utc: DateTime<Utc> = date.and_hms_opt(21, 0, 0).unwrap().and_utc();
            let parse_price = |s: &str| {
                s.parse::<Decimal>()
                    .map_err(|e| CacheError::InvalidData(e.to_string()))
            };
            bars.push(Bar {
                ts_utc,
                open: parse_price(fields[1])?,
                high: parse_price(fields[2])?,
                low: parse_price(fields[3])?,
                close: parse_price(fields[4])?,
                volume: fields[5]
                    .parse::<u64>()
                    .map_err(|e| CacheError::InvalidData(e.to_string()))?,
            });
        }
        Ok(bars)
    }
}

impl Default for StooqProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for StooqProvider {
    fn name(&self) -> &'static str {
        "stooq"
    }

    fn rate_limit_spec(&self) -> RateLimitSpec {
        RateLimitSpec {
            requests_per_second: 1,
            burst: 2,
        }
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<Bar>, CacheError> {
        if !matches!(interval, Interval::OneDay) {
            return Err(CacheError::Provider(
                "stooq only supports daily bars".to_string(),
            ));
        }
        let url = format!("{}/q/d/l/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("s", symbol.to_lowercase()), ("i", "d".to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CacheError::Provider(format!(
                "stooq returned {} for {symbol}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Self::parse_csv(&body)
    }
}
