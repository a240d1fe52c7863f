use catalyst_models::{FilterConfig, RejectionReason, ScoredItem};
use chrono::{DateTime, Utc};

/// Outcome of running an item through Filter & Admission (spec.md §4.G).
/// Admission enforces the append-only `NEW -> CLASSIFIED -> {ACCEPTED |
/// REJECTED}` transition: every item receives exactly one verdict, and
/// once rejected an item is never reconsidered in the same cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Accepted,
    Rejected(RejectionReason),
}

/// Evaluates the six admission conditions in spec order: ticker presence,
/// price presence, price band, staleness, minimum score, minimum
/// confidence. The first failing condition determines the rejection
/// reason; later conditions are not evaluated once one fails.
pub fn evaluate(item: &ScoredItem, config: &FilterConfig, now: DateTime<Utc>) -> Admission {
    if item.is_tickerless() {
        return Admission::Rejected(RejectionReason::NoTicker);
    }

    let Some(price) = item.last_price else {
        return Admission::Rejected(RejectionReason::NoPrice);
    };

    if price < config.min_price || price > config.max_price {
        return Admission::Rejected(RejectionReason::PriceOutOfBand);
    }

    let age = now - item.raw.ts_published;
    if age > chrono::Duration::seconds(config.max_staleness_secs) {
        return Admission::Rejected(RejectionReason::Stale);
    }

    if item.source_weight < config.min_score {
        return Admission::Rejected(RejectionReason::BelowMinScore);
    }

    if item.confidence < config.min_confidence {
        return Admission::Rejected(RejectionReason::BelowMinConfidence);
    }

    Admission::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_models::{OfferingSeverity, RawItem, Regime};
    use rust_decimal_macros::dec;

    fn base_item() -> ScoredItem {
        ScoredItem {
            raw: RawItem {
                source_id: "pr_wire".to_string(),
                canonical_id: "abc".to_string(),
                ts_published: Utc::now(),
                ts_observed: Utc::now(),
                title: "t".to_string(),
                body_snippet: None,
                link: "l".to_string(),
                tickers_hint: vec![],
            },
            tickers: vec!["XYZ".to_string()],
            keyword_score: 0.6,
            sentiment_score: 0.2,
            source_weight: 0.6,
            relevance: 0.6,
            regime: Regime::Neutral,
            regime_multiplier: 1.0,
            rvol_multiplier: 1.0,
            float_multiplier: 1.0,
            offering_penalty: 0.0,
            offering_severity: OfferingSeverity::None,
            last_price: Some(dec!(2.0)),
            currency: "USD".to_string(),
            confidence: 0.8,
        }
    }

    #[test]
    fn accepts_item_meeting_all_conditions() {
        let config = FilterConfig::default();
        assert_eq!(evaluate(&base_item(), &config, Utc::now()), Admission::Accepted);
    }

    #[test]
    fn rejects_tickerless_item_first() {
        let mut item = base_item();
        item.tickers = vec![];
        item.last_price = None;
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::NoTicker)
        );
    }

    #[test]
    fn rejects_missing_price() {
        let mut item = base_item();
        item.last_price = None;
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::NoPrice)
        );
    }

    #[test]
    fn rejects_price_out_of_band() {
        let mut item = base_item();
        item.last_price = Some(dec!(50.0));
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::PriceOutOfBand)
        );
    }

    #[test]
    fn rejects_stale_item() {
        let mut item = base_item();
        item.raw.ts_published = Utc::now() - chrono::Duration::hours(2);
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::Stale)
        );
    }

    #[test]
    fn rejects_below_min_score() {
        let mut item = base_item();
        item.source_weight = 0.1;
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::BelowMinScore)
        );
    }

    #[test]
    fn rejects_below_min_confidence() {
        let mut item = base_item();
        item.confidence = 0.1;
        let config = FilterConfig::default();
        assert_eq!(
            evaluate(&item, &config, Utc::now()),
            Admission::Rejected(RejectionReason::BelowMinConfidence)
        );
    }
}
