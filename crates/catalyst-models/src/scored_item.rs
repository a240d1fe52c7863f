use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::raw_item::RawItem;

/// Coarse market regime classification (spec.md §4.D).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    Bull,
    Bear,
    HighVol,
    Neutral,
    Crash,
}

impl Default for Regime {
    fn default() -> Self {
        Regime::Neutral
    }
}

/// Float-size classification bands (spec.md §4.D).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FloatClass {
    Micro,
    Low,
    Medium,
    High,
}

/// Dilution-severity bands for the offering parser (spec.md §4.D).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OfferingSeverity {
    None,
    Minor,
    Moderate,
    Severe,
    Extreme,
}

/// Classifier output carrying all signals needed for admission and alerting.
///
/// Embeds the originating `RawItem`. See spec.md §3 for field semantics and
/// invariants (c) and (d).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem {
    pub raw: RawItem,
    pub tickers: Vec<String>,
    pub keyword_score: f64,
    pub sentiment_score: f64,
    pub source_weight: f64,
    pub relevance: f64,
    pub regime: Regime,
    pub regime_multiplier: f64,
    pub rvol_multiplier: f64,
    pub float_multiplier: f64,
    pub offering_penalty: f64,
    pub offering_severity: OfferingSeverity,
    pub last_price: Option<Decimal>,
    pub currency: String,
    pub confidence: f64,
}

impl ScoredItem {
    pub fn is_tickerless(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn raw() -> RawItem {
        RawItem {
            source_id: "sec_8k".to_string(),
            canonical_id: "acc1".to_string(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            title: "t".to_string(),
            body_snippet: None,
            link: "l".to_string(),
            tickers_hint: vec![],
        }
    }

    #[test]
    fn regime_defaults_to_neutral() {
        assert_eq!(Regime::default(), Regime::Neutral);
    }

    #[test]
    fn tickerless_detection() {
        let item = ScoredItem {
            raw: raw(),
            tickers: vec![],
            keyword_score: 0.0,
            sentiment_score: 0.0,
            source_weight: 0.0,
            relevance: 0.0,
            regime: Regime::Neutral,
            regime_multiplier: 1.0,
            rvol_multiplier: 1.0,
            float_multiplier: 1.0,
            offering_penalty: 0.0,
            offering_severity: OfferingSeverity::None,
            last_price: None,
            currency: "USD".to_string(),
            confidence: 0.0,
        };
        assert!(item.is_tickerless());
    }

    #[test]
    fn roundtrip_scored_item() {
        let item = ScoredItem {
            raw: raw(),
            tickers: vec!["XYZ".to_string()],
            keyword_score: 0.5,
            sentiment_score: 0.3,
            source_weight: 0.857,
            relevance: 0.5,
            regime: Regime::Bull,
            regime_multiplier: 1.1,
            rvol_multiplier: 1.1,
            float_multiplier: 1.2,
            offering_penalty: 0.0,
            offering_severity: OfferingSeverity::None,
            last_price: Some(dec!(3.20)),
            currency: "USD".to_string(),
            confidence: 0.8,
        };
        let json = serde_json::to_string(&item).unwrap();
        let parsed: ScoredItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
    }
}
