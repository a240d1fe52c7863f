//! Wiring helpers that turn a loaded `Settings` into the concrete
//! components the daemon, analyzer, and bootstrap commands run against.
//! Kept separate from `main.rs` so the CLI stays a thin dispatcher.

pub mod bootstrap;
pub mod config;
pub mod daemon;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use catalyst_cache::{DiskCache, MarketDataCache, MemoryCache, ProviderChain, StooqProvider, TiingoProvider, YahooProvider};
use catalyst_classifier::{
    CachedFloatProvider, CachedOfferingProvider, CachedRegimeProvider, CachedSectorProvider, Classifier,
    KeywordMatcher, NullSentimentAnalyzer, VaderSentimentAnalyzer,
};
use catalyst_dedup::DedupStore;
use catalyst_feeds::{FetcherRegistry, GenericRssFetcher, PrWireFetcher};
use catalyst_models::{CacheConfig, ClassifierConfig, DedupConfig, FeedsConfig, Regime, Settings};
use catalyst_pipeline::{AlertDispatcher, Journal};

/// Builds the tiered market-data cache, wiring the provider chain in the
/// order named by `config.providers` (spec.md §4.C). An unrecognized
/// provider name is skipped with a warning rather than treated as fatal.
pub fn build_cache(config: &CacheConfig) -> Result<Arc<MarketDataCache>> {
    let memory = MemoryCache::new(config.memory_capacity);
    let disk = DiskCache::open(&config.disk_dir)
        .with_context(|| format!("opening disk cache at {}", config.disk_dir))?;

    let tiingo_token = std::env::var("CATALYST_TIINGO_TOKEN").unwrap_or_default();
    let mut providers: Vec<Box<dyn catalyst_cache::MarketDataProvider>> = Vec::new();
    for name in &config.providers {
        match name.as_str() {
            "tiingo" => providers.push(Box::new(TiingoProvider::new(tiingo_token.clone()))),
            "yahoo" => providers.push(Box::new(YahooProvider::new())),
            "stooq" => providers.push(Box::new(StooqProvider::new())),
            other => tracing::warn!(provider = other, "unknown provider name in config, skipping"),
        }
    }

    let chain = ProviderChain::new(providers);
    Ok(Arc::new(MarketDataCache::new(memory, disk, chain)))
}

/// Opens the dedup store, falling back to an in-memory store automatically
/// if the on-disk path cannot be opened (`DedupStore::open` never fails).
pub fn build_dedup(config: &DedupConfig) -> Arc<DedupStore> {
    Arc::new(DedupStore::open(&config.dir))
}

/// Assembles the feed fetcher registry from the configured PR-wire and
/// generic RSS URLs. SEC EDGAR fetchers require a CIK per issuer and are
/// wired in by the caller when tracking a known roster of tickers, since
/// `FeedsConfig` intentionally stays issuer-agnostic.
pub fn build_fetcher_registry(config: &FeedsConfig) -> FetcherRegistry {
    let mut fetchers: Vec<Arc<dyn catalyst_feeds::FeedFetcher>> = Vec::new();

    for (i, url) in config.pr_wire_urls.iter().enumerate() {
        let source_id: &'static str = Box::leak(format!("pr_wire_{i}").into_boxed_str());
        fetchers.push(Arc::new(PrWireFetcher::new(url.clone(), source_id)));
    }
    for url in &config.generic_rss_urls {
        fetchers.push(Arc::new(GenericRssFetcher::new(url.clone(), "generic_rss")));
    }

    FetcherRegistry::new(fetchers, std::time::Duration::from_secs(config.fetch_timeout_secs))
}

/// Loads the keyword weight table from `config.keywords_path` (a flat TOML
/// table of phrase -> weight) and wires every enrichment provider the
/// classifier depends on (spec.md §4.D, §4.F).
pub fn build_classifier(cache: Arc<MarketDataCache>, config: &ClassifierConfig) -> Result<Arc<Classifier>> {
    let weights = load_keyword_weights(&config.keywords_path)?;
    let matcher = KeywordMatcher::from_weights(weights);

    let sentiment: Box<dyn catalyst_classifier::SentimentAnalyzer> = if config.sentiment_enabled {
        Box::new(VaderSentimentAnalyzer::new())
    } else {
        Box::new(NullSentimentAnalyzer)
    };

    let regime_provider = Box::new(CachedRegimeProvider::new(
        std::time::Duration::from_secs(300),
        Box::new(|| Regime::Neutral),
    ));
    let sector_provider = Box::new(CachedSectorProvider::new(std::time::Duration::from_secs(86_400), |_| None));
    let float_provider = Box::new(CachedFloatProvider::new(std::time::Duration::from_secs(86_400), |_| {
        50_000_000
    }));
    let offering_provider = Box::new(CachedOfferingProvider::default());

    Ok(Arc::new(Classifier::new(
        cache,
        matcher,
        sentiment,
        regime_provider,
        sector_provider,
        float_provider,
        offering_provider,
        config.sentiment_alpha,
    )))
}

fn load_keyword_weights(path: &str) -> Result<HashMap<String, f64>> {
    let p = std::path::Path::new(path);
    if !p.exists() {
        tracing::warn!(%path, "keyword weights file not found, starting with an empty table");
        return Ok(HashMap::new());
    }
    let raw = std::fs::read_to_string(p).with_context(|| format!("reading keyword weights from {path}"))?;
    let table: HashMap<String, f64> =
        toml::from_str(&raw).with_context(|| format!("parsing keyword weights from {path}"))?;
    Ok(table)
}

pub fn build_dispatcher(settings: &Settings) -> Arc<AlertDispatcher> {
    Arc::new(AlertDispatcher::new(&settings.dispatch))
}

pub fn build_journals(data_dir: &str) -> Result<(Arc<Journal>, Arc<Journal>)> {
    let accepted = Journal::open(format!("{data_dir}/events.jsonl")).context("opening events journal")?;
    let rejected = Journal::open(format!("{data_dir}/rejected_items.jsonl")).context("opening rejected journal")?;
    Ok((Arc::new(accepted), Arc::new(rejected)))
}
