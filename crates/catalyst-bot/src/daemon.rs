use std::collections::HashMap;
use std::sync::Arc;

use catalyst_cache::MarketDataCache;
use catalyst_classifier::Classifier;
use catalyst_dedup::DedupStore;
use catalyst_feeds::FetcherRegistry;
use catalyst_models::{AcceptedRecord, ClassificationSummary, RejectedRecord, Settings};
use catalyst_pipeline::{evaluate, Admission, AlertDispatcher, HeartbeatStats, Journal};
use chrono::Utc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::session::SessionClock;

/// Drives the full ingest-to-alert cycle loop (spec.md §5): Clock/Session
/// (A) picks the cadence, Feed Fetchers (E) run concurrently, items pass
/// through Dedup (B), the Classifier (F, backed by the cache C and
/// enrichment providers D), then Filter & Admission (G), finally landing
/// in the Alert Dispatcher (H) and Event Logs (I). A separate task runs
/// the Historical Analyzer (J) once a day at a configured UTC hour, and a
/// third emits periodic heartbeats (K). All tasks honor a shared
/// `CancellationToken` for cooperative shutdown.
pub struct Daemon {
    settings: Settings,
    cache: Arc<MarketDataCache>,
    dedup: Arc<DedupStore>,
    registry: Mutex<FetcherRegistry>,
    classifier: Arc<Classifier>,
    dispatcher: Arc<AlertDispatcher>,
    accepted_journal: Arc<Journal>,
    rejected_journal: Arc<Journal>,
    heartbeat: Arc<Mutex<HeartbeatStats>>,
    cancel: CancellationToken,
}

impl Daemon {
    pub fn new(
        settings: Settings,
        cache: Arc<MarketDataCache>,
        dedup: Arc<DedupStore>,
        registry: FetcherRegistry,
        classifier: Arc<Classifier>,
        dispatcher: Arc<AlertDispatcher>,
        accepted_journal: Arc<Journal>,
        rejected_journal: Arc<Journal>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            settings,
            cache,
            dedup,
            registry: Mutex::new(registry),
            classifier,
            dispatcher,
            accepted_journal,
            rejected_journal,
            heartbeat: Arc::new(Mutex::new(HeartbeatStats::default())),
            cancel,
        }
    }

    pub async fn run(self: Arc<Self>) {
        let mut set = tokio::task::JoinSet::new();

        {
            let daemon = self.clone();
            set.spawn(async move { daemon.cycle_loop().await });
        }
        {
            let daemon = self.clone();
            set.spawn(async move { daemon.heartbeat_loop().await });
        }
        {
            let daemon = self.clone();
            set.spawn(async move { daemon.analyzer_loop().await });
        }

        while set.join_next().await.is_some() {}
    }

    async fn cycle_loop(&self) {
        let mut last_fetch_since = Utc::now() - chrono::Duration::minutes(5);
        loop {
            if self.cancel.is_cancelled() {
                return;
            }
            let session = SessionClock::current_session(Utc::now());
            let delay = SessionClock::next_cycle_delay(session, &self.settings.session);

            let cycle_start = Utc::now();
            if let Err(err) = self.run_cycle(last_fetch_since).await {
                error!(error = %err, "cycle failed");
            }
            last_fetch_since = cycle_start;

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Runs a single ingest-to-alert cycle synchronously, exposed so
    /// integration tests can drive the daemon without the background
    /// cycle/heartbeat/analyzer loops.
    pub async fn run_one_cycle(&self, since: chrono::DateTime<Utc>) -> anyhow::Result<()> {
        self.run_cycle(since).await
    }

    async fn run_cycle(&self, since: chrono::DateTime<Utc>) -> anyhow::Result<()> {
        let raw_items = {
            let mut registry = self.registry.lock().await;
            registry.fetch_all(since).await
        };

        let mut items_seen = 0u64;
        let mut accepted: Vec<AcceptedRecord> = Vec::new();
        for outcome in raw_items {
            for item in outcome.items {
                items_seen += 1;
                let already_seen = self.dedup.seen(&item.source_id, &item.canonical_id)?;
                if already_seen {
                    continue;
                }
                self.dedup.mark(&item.source_id, &item.canonical_id, Utc::now())?;
                if let Some(record) = self.process_item(item).await? {
                    accepted.push(record);
                }
            }
        }

        // Dispatch in score-descending order within the cycle (spec.md §5),
        // then drain once so the hourly/per-channel limiters see the whole
        // cycle's batch rather than being checked per item.
        accepted.sort_by(|a, b| {
            b.cls
                .source_weight
                .partial_cmp(&a.cls.source_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for record in accepted {
            self.dispatcher.enqueue(record);
            self.heartbeat.lock().await.record_dispatch();
        }
        self.dispatcher.drain().await.ok();

        let (cache_hits, cache_misses) = self.cache.take_cache_counts();
        let provider_errors = self.cache.take_provider_error_counts();
        {
            let mut heartbeat = self.heartbeat.lock().await;
            heartbeat.record_cache_hits(cache_hits);
            heartbeat.record_cache_misses(cache_misses);
            heartbeat.record_provider_errors(&provider_errors);
            heartbeat.record_cycle(items_seen);
        }
        Ok(())
    }

    async fn process_item(&self, item: catalyst_models::RawItem) -> anyhow::Result<Option<AcceptedRecord>> {
        let source_id = item.source_id.clone();
        let canonical_id = item.canonical_id.clone();
        let title = item.title.clone();
        let link = item.link.clone();
        let ts_published = item.ts_published;
        let ts_observed = item.ts_observed;

        let scored = match self.classifier.classify(item).await {
            Ok(scored) => scored,
            Err(err) => {
                warn!(%canonical_id, error = %err, "classification failed");
                let record = RejectedRecord {
                    schema: RejectedRecord::current_schema(),
                    ts_published,
                    ts_observed,
                    source_id,
                    canonical_id,
                    tickers: vec![],
                    title,
                    link,
                    cls: None,
                    reason: catalyst_models::RejectionReason::ClassifierError,
                    rejected_at: Utc::now(),
                };
                self.rejected_journal.append(&record)?;
                self.heartbeat.lock().await.record_rejection(record.reason.as_str());
                return Ok(None);
            }
        };

        let admission = evaluate(&scored, &self.settings.filter, Utc::now());
        let summary = ClassificationSummary {
            keyword_score: scored.keyword_score,
            sentiment_score: scored.sentiment_score,
            source_weight: scored.source_weight,
            relevance: scored.relevance,
            regime: scored.regime,
            float_class: None,
            offering_severity: scored.offering_severity,
            confidence: scored.confidence,
        };

        match admission {
            Admission::Accepted => {
                let record = AcceptedRecord {
                    schema: AcceptedRecord::current_schema(),
                    ts_published: scored.raw.ts_published,
                    ts_observed: scored.raw.ts_observed,
                    source_id: scored.raw.source_id.clone(),
                    canonical_id: scored.raw.canonical_id.clone(),
                    tickers: scored.tickers.clone(),
                    title: scored.raw.title.clone(),
                    link: scored.raw.link.clone(),
                    cls: summary,
                    dispatched_at: Utc::now(),
                };
                self.accepted_journal.append(&record)?;
                Ok(Some(record))
            }
            Admission::Rejected(reason) => {
                let record = RejectedRecord {
                    schema: RejectedRecord::current_schema(),
                    ts_published: scored.raw.ts_published,
                    ts_observed: scored.raw.ts_observed,
                    source_id: scored.raw.source_id.clone(),
                    canonical_id: scored.raw.canonical_id.clone(),
                    tickers: scored.tickers.clone(),
                    title: scored.raw.title.clone(),
                    link: scored.raw.link.clone(),
                    cls: Some(summary),
                    reason,
                    rejected_at: Utc::now(),
                };
                self.rejected_journal.append(&record)?;
                self.heartbeat.lock().await.record_rejection(reason.as_str());
                Ok(None)
            }
        }
    }

    async fn heartbeat_loop(&self) {
        let interval = std::time::Duration::from_secs(self.settings.heartbeat.interval_secs);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(interval) => {}
            }
            let snapshot = self.heartbeat.lock().await.take();
            info!(
                cycles_run = snapshot.cycles_run,
                items_seen = snapshot.items_seen,
                items_dispatched = snapshot.items_dispatched,
                mean_items_per_cycle = snapshot.mean_items_per_cycle(),
                cache_hit_rate = snapshot.cache_hit_rate(),
                "heartbeat"
            );
        }
    }

    async fn analyzer_loop(&self) {
        loop {
            let now = Utc::now();
            let target_hour = self.settings.analyzer.run_at_utc_hour;
            let mut next_run = now
                .date_naive()
                .and_hms_opt(target_hour, 0, 0)
                .unwrap()
                .and_utc();
            if next_run <= now {
                next_run += chrono::Duration::days(1);
            }
            let wait = (next_run - now).to_std().unwrap_or(std::time::Duration::from_secs(60));

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(wait) => {}
            }
            if self.cancel.is_cancelled() {
                return;
            }

            let analyzer = catalyst_analyzer::Analyzer::new(
                &self.cache,
                &self.rejected_journal,
                &self.settings.analyzer,
                "./data/recommendations.json",
            );
            match analyzer.run(Utc::now(), &HashMap::new()).await {
                Ok(report) => info!(
                    recommendations = report.recommendations.len(),
                    "analyzer run complete"
                ),
                Err(err) => error!(error = %err, "analyzer run failed"),
            }
        }
    }
}
