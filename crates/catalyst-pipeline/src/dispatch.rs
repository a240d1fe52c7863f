use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::Mutex;

use catalyst_models::{AcceptedRecord, DispatchConfig};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest_middleware::ClientBuilder;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tracing::warn;

use crate::error::PipelineError;

type HourlyLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Outbound alert queue and webhook sender (spec.md §4.H). Enforces both a
/// per-channel burst quota (e.g. 5 alerts / 2s) and a global hourly
/// dispatch cap via `governor` token buckets, bounds its pending queue,
/// and drops the oldest queued alert (logging `dispatch_dropped`) rather
/// than growing unbounded when the webhook endpoint falls behind.
pub struct AlertDispatcher {
    client: reqwest_middleware::ClientWithMiddleware,
    webhook_url: String,
    hourly_limiter: HourlyLimiter,
    channel_limiter: HourlyLimiter,
    queue: Mutex<VecDeque<AcceptedRecord>>,
    queue_capacity: usize,
}

impl AlertDispatcher {
    pub fn new(config: &DispatchConfig) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let per_hour = NonZeroU32::new(config.max_per_hour.max(1)).unwrap_or(nonzero!(1u32));
        let hourly_limiter = RateLimiter::direct(Quota::per_hour(per_hour));

        let burst = NonZeroU32::new(config.per_channel_burst.max(1)).unwrap_or(nonzero!(1u32));
        let window = std::time::Duration::from_secs(config.per_channel_window_secs.max(1));
        let channel_quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(nonzero!(1u32)))
            .allow_burst(burst);
        let channel_limiter = RateLimiter::direct(channel_quota);

        Self {
            client,
            webhook_url: config.webhook_url.clone(),
            hourly_limiter,
            channel_limiter,
            queue: Mutex::new(VecDeque::new()),
            queue_capacity: config.queue_capacity,
        }
    }

    /// Enqueues an accepted alert, dropping the oldest queued item if the
    /// queue is already at capacity.
    pub fn enqueue(&self, record: AcceptedRecord) {
        let mut queue = self.queue.lock().unwrap();
        if queue.len() >= self.queue_capacity {
            if let Some(dropped) = queue.pop_front() {
                warn!(
                    canonical_id = %dropped.canonical_id,
                    event = "dispatch_dropped",
                    "dispatch queue at capacity, dropped oldest alert"
                );
            }
        }
        queue.push_back(record);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Drains and sends as many queued alerts as the hourly rate allows.
    /// Returns the number successfully sent.
    pub async fn drain(&self) -> Result<u64, PipelineError> {
        let mut sent = 0u64;
        loop {
            if self.hourly_limiter.check().is_err() || self.channel_limiter.check().is_err() {
                break;
            }
            let next = {
                let mut queue = self.queue.lock().unwrap();
                queue.pop_front()
            };
            let Some(record) = next else { break };

            match self.send(&record).await {
                Ok(()) => sent += 1,
                Err(err) => {
                    warn!(canonical_id = %record.canonical_id, error = %err, "alert dispatch failed after retries");
                }
            }
        }
        Ok(sent)
    }

    async fn send(&self, record: &AcceptedRecord) -> Result<(), PipelineError> {
        if self.webhook_url.is_empty() {
            return Ok(());
        }
        let response = self
            .client
            .post(&self.webhook_url)
            .json(record)
            .send()
            .await
            .map_err(PipelineError::Middleware)?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "webhook returned non-success status");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalyst_models::ClassificationSummary;
    use catalyst_models::{FloatClass, OfferingSeverity, Regime};
    use chrono::Utc;

    fn record(id: &str) -> AcceptedRecord {
        AcceptedRecord {
            schema: AcceptedRecord::current_schema(),
            ts_published: Utc::now(),
            ts_observed: Utc::now(),
            source_id: "pr_wire".to_string(),
            canonical_id: id.to_string(),
            tickers: vec!["XYZ".to_string()],
            title: "t".to_string(),
            link: "l".to_string(),
            cls: ClassificationSummary {
                keyword_score: 0.5,
                sentiment_score: 0.2,
                source_weight: 0.6,
                relevance: 0.5,
                regime: Regime::Neutral,
                float_class: Some(FloatClass::Micro),
                offering_severity: OfferingSeverity::None,
                confidence: 0.7,
            },
            dispatched_at: Utc::now(),
        }
    }

    #[test]
    fn enqueue_respects_capacity_and_drops_oldest() {
        let config = DispatchConfig {
            webhook_url: String::new(),
            max_per_hour: 120,
            queue_capacity: 2,
            max_retries: 3,
            per_channel_burst: 5,
            per_channel_window_secs: 2,
        };
        let dispatcher = AlertDispatcher::new(&config);
        dispatcher.enqueue(record("a"));
        dispatcher.enqueue(record("b"));
        dispatcher.enqueue(record("c"));
        assert_eq!(dispatcher.queue_len(), 2);
    }

    #[tokio::test]
    async fn drain_is_a_noop_with_empty_queue() {
        let config = DispatchConfig {
            webhook_url: String::new(),
            max_per_hour: 120,
            queue_capacity: 10,
            max_retries: 3,
            per_channel_burst: 5,
            per_channel_window_secs: 2,
        };
        let dispatcher = AlertDispatcher::new(&config);
        let sent = dispatcher.drain().await.unwrap();
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn drain_sends_queued_alert_with_empty_webhook_url() {
        let config = DispatchConfig {
            webhook_url: String::new(),
            max_per_hour: 120,
            queue_capacity: 10,
            max_retries: 3,
            per_channel_burst: 5,
            per_channel_window_secs: 2,
        };
        let dispatcher = AlertDispatcher::new(&config);
        dispatcher.enqueue(record("a"));
        let sent = dispatcher.drain().await.unwrap();
        assert_eq!(sent, 1);
    }
}
