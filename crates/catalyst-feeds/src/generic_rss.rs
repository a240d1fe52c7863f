use async_trait::async_trait;
use catalyst_models::RawItem;
use chrono::{DateTime, Utc};
use rss::Channel;

use crate::error::FeedError;
use crate::fetcher::FeedFetcher;
use crate::normalize::{fallback_canonical_id, normalize_link, normalize_title};

/// A tolerant RSS/Atom fetcher for generic news sources that are not
/// dedicated press-release wires. Tickers are extracted downstream by the
/// classifier; this fetcher only normalizes the raw item (spec.md §4.E).
pub struct GenericRssFetcher {
    client: reqwest::Client,
    feed_url: String,
    source_id: String,
}

impl GenericRssFetcher {
    pub fn new(feed_url: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            feed_url: feed_url.into(),
            source_id: source_id.into(),
        }
    }

    fn parse_item(&self, item: &rss::Item, observed: DateTime<Utc>) -> Option<RawItem> {
        let title = item.title()?.to_string();
        let link = item.link().or_else(|| item.guid().map(|g| g.value()))?.to_string();
        let ts_published = item
            .pub_date()
            .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(observed);

        let canonical_id = item
            .guid()
            .map(|g| g.value().to_string())
            .unwrap_or_else(|| fallback_canonical_id(&title, ts_published));

        Some(RawItem {
            source_id: self.source_id.clone(),
            canonical_id,
            ts_published,
            ts_observed: observed,
            title: normalize_title(&title),
            body_snippet: item.description().map(normalize_title),
            link: normalize_link(&link),
            tickers_hint: vec![],
        })
    }
}

#[async_trait]
impl FeedFetcher for GenericRssFetcher {
    fn source_id(&self) -> String {
        self.source_id.clone()
    }

    async fn fetch(&self, since: DateTime<Utc>) -> Result<Vec<RawItem>, FeedError> {
        let response = self.client.get(&self.feed_url).send().await?;
        let bytes = response.bytes().await?;
        let channel = Channel::read_from(&bytes[..]).map_err(|e| FeedError::Parse(e.to_string()))?;
        let observed = Utc::now();

        let items = channel
            .items()
            .iter()
            .filter_map(|item| self.parse_item(item, observed))
            .filter(|raw| raw.ts_published >= since)
            .collect();
        Ok(items)
    }
}
