use std::sync::Arc;

use catalyst_cache::MarketDataCache;
use catalyst_models::{RawItem, Regime, ScoredItem};
use chrono::Utc;

use crate::composition::{base_score, composed_score, confidence, source_weight};
use crate::error::ClassifierError;
use crate::float::{float_multiplier, FloatProvider};
use crate::keywords::KeywordMatcher;
use crate::offering::OfferingProvider;
use crate::regime::RegimeProvider;
use crate::rvol::RvolProvider;
use crate::sector::SectorProvider;
use crate::sentiment::SentimentAnalyzer;
use crate::ticker::extract_tickers;

/// Orchestrates the full classification pipeline (spec.md §4.F, steps
/// 1-7): ticker resolution, keyword + sentiment scoring, enrichment
/// (regime/rvol/float/sector/offering), and final composition into a
/// `ScoredItem`. Never fails on missing enrichment data — providers
/// degrade gracefully to neutral defaults, and it is Filter & Admission's
/// job, not the classifier's, to reject weak items.
pub struct Classifier {
    cache: Arc<MarketDataCache>,
    keyword_matcher: KeywordMatcher,
    sentiment: Box<dyn SentimentAnalyzer>,
    regime_provider: Box<dyn RegimeProvider>,
    sector_provider: Box<dyn SectorProvider>,
    float_provider: Box<dyn FloatProvider>,
    offering_provider: Box<dyn OfferingProvider>,
    sentiment_alpha: f64,
}

impl Classifier {
    pub fn new(
        cache: Arc<MarketDataCache>,
        keyword_matcher: KeywordMatcher,
        sentiment: Box<dyn SentimentAnalyzer>,
        regime_provider: Box<dyn RegimeProvider>,
        sector_provider: Box<dyn SectorProvider>,
        float_provider: Box<dyn FloatProvider>,
        offering_provider: Box<dyn OfferingProvider>,
        sentiment_alpha: f64,
    ) -> Self {
        Self {
            cache,
            keyword_matcher,
            sentiment,
            regime_provider,
            sector_provider,
            float_provider,
            offering_provider,
            sentiment_alpha,
        }
    }

    pub async fn classify(&self, raw: RawItem) -> Result<ScoredItem, ClassifierError> {
        let text = format!(
            "{} {}",
            raw.title,
            raw.body_snippet.as_deref().unwrap_or("")
        );

        let tickers = extract_tickers(&text, &raw.tickers_hint);
        let (keyword_score, matched_keywords) = self.keyword_matcher.score(&text);
        let sentiment_score = self.sentiment.score(&text);
        let base = base_score(keyword_score, sentiment_score, self.sentiment_alpha);

        let regime = self.regime_provider.regime().await.unwrap_or(Regime::Neutral);
        let regime_multiplier = self.regime_provider.multiplier(regime);

        let primary_ticker = tickers.first().cloned();

        let (rvol_multiplier, last_price, sector) = if let Some(ticker) = &primary_ticker {
            let rvol_provider = RvolProvider::new(&self.cache);
            let rvol = rvol_provider.rvol(ticker).await.unwrap_or(1.0);
            let rvol_multiplier = RvolProvider::multiplier(rvol);
            let last_price = self.cache.price_at(ticker, Utc::now()).await.ok();
            let sector = self.sector_provider.sector(ticker).await.unwrap_or(None);
            (rvol_multiplier, last_price, sector)
        } else {
            (1.0, None, None)
        };

        let float_class = if let Some(ticker) = &primary_ticker {
            self.float_provider.float_class(ticker).await.ok()
        } else {
            None
        };
        let float_mult = float_class.map(float_multiplier).unwrap_or(1.0);

        let offering_severity = self
            .offering_provider
            .severity(primary_ticker.as_deref().unwrap_or(""), &text)
            .await
            .unwrap_or(catalyst_models::OfferingSeverity::None);
        let penalty = crate::offering::offering_penalty(offering_severity);

        let composed = composed_score(base, regime_multiplier, rvol_multiplier, float_mult);
        let weight = source_weight(composed, penalty);
        let conf = confidence(last_price.is_some(), sector.is_some(), matched_keywords.len());

        Ok(ScoredItem {
            raw,
            tickers,
            keyword_score,
            sentiment_score,
            source_weight: weight,
            relevance: keyword_score.abs(),
            regime,
            regime_multiplier,
            rvol_multiplier,
            float_multiplier: float_mult,
            offering_penalty: penalty,
            offering_severity,
            last_price,
            currency: "USD".to_string(),
            confidence: conf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordEntry;
    use crate::offering::CachedOfferingProvider;
    use crate::regime::CachedRegimeProvider;
    use crate::sector::CachedSectorProvider;
    use crate::sentiment::NullSentimentAnalyzer;
    use catalyst_cache::{DiskCache, MemoryCache, ProviderChain};
    use chrono::Utc;

    fn raw_item(title: &str, tickers_hint: Vec<String>) -> RawItem {
        RawItem {
            source_id: "pr_wire".to_string(),
            canonical_id: "abc".to_string(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            title: title.to_string(),
            body_snippet: None,
            link: "https://example.com".to_string(),
            tickers_hint,
        }
    }

    fn test_classifier() -> Classifier {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(MarketDataCache::new(
            MemoryCache::new(100),
            DiskCache::open(dir.path()).unwrap(),
            ProviderChain::new(vec![]),
        ));
        Classifier::new(
            cache,
            KeywordMatcher::new(vec![KeywordEntry::new("phase 3", 0.6)]),
            Box::new(NullSentimentAnalyzer),
            Box::new(CachedRegimeProvider::new(
                std::time::Duration::from_secs(60),
                Box::new(|| Regime::Neutral),
            )),
            Box::new(CachedSectorProvider::new(std::time::Duration::from_secs(60), |_| None)),
            Box::new(crate::float::CachedFloatProvider::new(
                std::time::Duration::from_secs(60),
                |_| 5_000_000,
            )),
            Box::new(CachedOfferingProvider::default()),
            0.3,
        )
    }

    #[tokio::test]
    async fn classifies_tickerless_item_without_erroring() {
        let classifier = test_classifier();
        let scored = classifier
            .classify(raw_item("Generic market commentary", vec![]))
            .await
            .unwrap();
        assert!(scored.is_tickerless());
        assert_eq!(scored.regime_multiplier, 1.0);
    }

    #[tokio::test]
    async fn keyword_match_contributes_to_source_weight() {
        let classifier = test_classifier();
        let scored = classifier
            .classify(raw_item("Company reports positive Phase 3 data (NASDAQ: XYZ)", vec![]))
            .await
            .unwrap();
        assert_eq!(scored.tickers, vec!["XYZ".to_string()]);
        assert!(scored.source_weight > 0.0);
    }

    #[tokio::test]
    async fn dilution_language_applies_negative_penalty() {
        let classifier = test_classifier();
        let scored = classifier
            .classify(raw_item(
                "Company announces going concern doubt and reverse stock split (NASDAQ: XYZ)",
                vec![],
            ))
            .await
            .unwrap();
        assert!(scored.offering_penalty < 0.0);
    }
}
