use std::collections::HashMap;
use std::sync::Arc;

use catalyst_models::RawItem;
use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tracing::warn;

use crate::fetcher::{fetch_with_timeout, FeedFetcher};

/// Per-cycle fetch outcome for one fetcher: either the items it returned,
/// or a note that it failed/timed out. The registry never retries within a
/// cycle (spec.md §4.E) — a failing fetcher simply contributes zero items
/// and increments its error counter for the heartbeat to report.
pub struct FetchOutcome {
    pub source_id: String,
    pub items: Vec<RawItem>,
    pub errored: bool,
}

/// Drives every configured `FeedFetcher` concurrently within a bounded
/// per-fetcher timeout, collecting whatever comes back without blocking
/// the cycle on a single slow source.
pub struct FetcherRegistry {
    fetchers: Vec<Arc<dyn FeedFetcher>>,
    timeout: std::time::Duration,
    error_counts: HashMap<String, u64>,
}

impl FetcherRegistry {
    pub fn new(fetchers: Vec<Arc<dyn FeedFetcher>>, timeout: std::time::Duration) -> Self {
        Self {
            fetchers,
            timeout,
            error_counts: HashMap::new(),
        }
    }

    pub async fn fetch_all(&mut self, since: DateTime<Utc>) -> Vec<FetchOutcome> {
        let mut set = JoinSet::new();
        for fetcher in &self.fetchers {
            let fetcher = fetcher.clone();
            let timeout = self.timeout;
            set.spawn(async move {
                let source_id = fetcher.source_id();
                match fetch_with_timeout(fetcher.as_ref(), since, timeout).await {
                    Ok(items) => FetchOutcome {
                        source_id,
                        items,
                        errored: false,
                    },
                    Err(err) => {
                        warn!(%source_id, error = %err, "feed fetch failed");
                        FetchOutcome {
                            source_id,
                            items: Vec::new(),
                            errored: true,
                        }
                    }
                }
            });
        }

        let mut outcomes = Vec::with_capacity(self.fetchers.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(outcome) => {
                    if outcome.errored {
                        *self.error_counts.entry(outcome.source_id.clone()).or_insert(0) += 1;
                    }
                    outcomes.push(outcome);
                }
                Err(join_err) => {
                    warn!(error = %join_err, "fetcher task panicked");
                }
            }
        }
        outcomes
    }

    pub fn error_count(&self, source_id: &str) -> u64 {
        self.error_counts.get(source_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use async_trait::async_trait;

    struct StaticFetcher {
        id: &'static str,
        items: Vec<RawItem>,
    }

    #[async_trait]
    impl FeedFetcher for StaticFetcher {
        fn source_id(&self) -> String {
            self.id.to_string()
        }

        async fn fetch(&self, _since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError> {
            Ok(self.items.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl FeedFetcher for FailingFetcher {
        fn source_id(&self) -> String {
            "failing".to_string()
        }

        async fn fetch(&self, _since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError> {
            Err(FeedError::Parse("boom".to_string()))
        }
    }

    fn raw(title: &str) -> RawItem {
        RawItem {
            source_id: "x".to_string(),
            canonical_id: "c".to_string(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            title: title.to_string(),
            body_snippet: None,
            link: "l".to_string(),
            tickers_hint: vec![],
        }
    }

    #[tokio::test]
    async fn collects_items_from_all_fetchers_independently() {
        let fetchers: Vec<Arc<dyn FeedFetcher>> = vec![
            Arc::new(StaticFetcher { id: "a", items: vec![raw("one")] }),
            Arc::new(FailingFetcher),
        ];
        let mut registry = FetcherRegistry::new(fetchers, std::time::Duration::from_secs(5));
        let outcomes = registry.fetch_all(Utc::now()).await;

        let total_items: usize = outcomes.iter().map(|o| o.items.len()).sum();
        assert_eq!(total_items, 1);
        assert_eq!(registry.error_count("failing"), 1);
        assert_eq!(registry.error_count("a"), 0);
    }
}
