use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Session classifier configuration (spec.md §4.A).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_premarket_cycle_secs")]
    pub premarket_cycle_secs: u64,
    #[serde(default = "default_regular_cycle_secs")]
    pub regular_cycle_secs: u64,
    #[serde(default = "default_afterhours_cycle_secs")]
    pub afterhours_cycle_secs: u64,
    #[serde(default = "default_closed_cycle_secs")]
    pub closed_cycle_secs: u64,
}

fn default_premarket_cycle_secs() -> u64 {
    30
}
fn default_regular_cycle_secs() -> u64 {
    15
}
fn default_afterhours_cycle_secs() -> u64 {
    60
}
fn default_closed_cycle_secs() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            premarket_cycle_secs: default_premarket_cycle_secs(),
            regular_cycle_secs: default_regular_cycle_secs(),
            afterhours_cycle_secs: default_afterhours_cycle_secs(),
            closed_cycle_secs: default_closed_cycle_secs(),
        }
    }
}

/// Market Data Cache configuration (spec.md §4.C).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
    #[serde(default = "default_disk_dir")]
    pub disk_dir: String,
    #[serde(default = "default_prefetch_workers")]
    pub prefetch_workers: usize,
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
}

fn default_memory_capacity() -> u64 {
    5_000
}
fn default_disk_dir() -> String {
    "./data/cache".to_string()
}
fn default_prefetch_workers() -> usize {
    10
}
fn default_providers() -> Vec<String> {
    vec![
        "tiingo".to_string(),
        "yahoo".to_string(),
        "stooq".to_string(),
    ]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            disk_dir: default_disk_dir(),
            prefetch_workers: default_prefetch_workers(),
            providers: default_providers(),
        }
    }
}

/// Dedup Store configuration (spec.md §4.B). `retention_days` resolves the
/// spec's open question on retention window: 14 days, configurable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DedupConfig {
    #[serde(default = "default_dedup_dir")]
    pub dir: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_dedup_dir() -> String {
    "./data/dedup".to_string()
}
fn default_retention_days() -> u32 {
    14
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            dir: default_dedup_dir(),
            retention_days: default_retention_days(),
        }
    }
}

/// Feed Fetcher configuration (spec.md §4.E).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedsConfig {
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_sec_user_agent")]
    pub sec_user_agent: String,
    #[serde(default = "default_pr_wire_urls")]
    pub pr_wire_urls: Vec<String>,
    #[serde(default = "default_generic_rss_urls")]
    pub generic_rss_urls: Vec<String>,
}

fn default_fetch_timeout_secs() -> u64 {
    8
}
fn default_sec_user_agent() -> String {
    "catalyst-bot admin@example.com".to_string()
}
fn default_pr_wire_urls() -> Vec<String> {
    Vec::new()
}
fn default_generic_rss_urls() -> Vec<String> {
    Vec::new()
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            sec_user_agent: default_sec_user_agent(),
            pr_wire_urls: default_pr_wire_urls(),
            generic_rss_urls: default_generic_rss_urls(),
        }
    }
}

/// Classifier configuration (spec.md §4.F). `sentiment_alpha` resolves the
/// spec's flagged open question on the sentiment coefficient: 0.3 by
/// default (a milder blend than the 0.5 alternative considered and
/// documented in DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default = "default_sentiment_alpha")]
    pub sentiment_alpha: f64,
    #[serde(default = "default_sentiment_enabled")]
    pub sentiment_enabled: bool,
    #[serde(default = "default_keywords_path")]
    pub keywords_path: String,
}

fn default_sentiment_alpha() -> f64 {
    0.3
}
fn default_sentiment_enabled() -> bool {
    true
}
fn default_keywords_path() -> String {
    "./config/keywords.toml".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sentiment_alpha: default_sentiment_alpha(),
            sentiment_enabled: default_sentiment_enabled(),
            keywords_path: default_keywords_path(),
        }
    }
}

/// Filter & Admission configuration (spec.md §4.G).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_min_price")]
    pub min_price: Decimal,
    #[serde(default = "default_max_price")]
    pub max_price: Decimal,
    #[serde(default = "default_max_staleness_secs")]
    pub max_staleness_secs: i64,
    #[serde(default = "default_tiebreak_tickers_with_shared_canonical_id")]
    pub tiebreak_tickers_with_shared_canonical_id: bool,
}

fn default_min_score() -> f64 {
    0.4
}
fn default_min_confidence() -> f64 {
    0.5
}
fn default_min_price() -> Decimal {
    dec!(0.10)
}
fn default_max_price() -> Decimal {
    dec!(5.0)
}
fn default_max_staleness_secs() -> i64 {
    900
}
fn default_tiebreak_tickers_with_shared_canonical_id() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            min_confidence: default_min_confidence(),
            min_price: default_min_price(),
            max_price: default_max_price(),
            max_staleness_secs: default_max_staleness_secs(),
            tiebreak_tickers_with_shared_canonical_id:
                default_tiebreak_tickers_with_shared_canonical_id(),
        }
    }
}

/// Alert Dispatcher configuration (spec.md §4.H).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchConfig {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "default_max_per_hour")]
    pub max_per_hour: u32,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Burst size of the per-channel token bucket (spec.md §4.H), checked
    /// alongside the hourly cap so a single quiet hour can't be spent in
    /// one noisy burst.
    #[serde(default = "default_per_channel_burst")]
    pub per_channel_burst: u32,
    #[serde(default = "default_per_channel_window_secs")]
    pub per_channel_window_secs: u64,
}

fn default_webhook_url() -> String {
    String::new()
}
fn default_max_per_hour() -> u32 {
    120
}
fn default_queue_capacity() -> usize {
    500
}
fn default_max_retries() -> u32 {
    3
}
fn default_per_channel_burst() -> u32 {
    5
}
fn default_per_channel_window_secs() -> u64 {
    2
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            max_per_hour: default_max_per_hour(),
            queue_capacity: default_queue_capacity(),
            max_retries: default_max_retries(),
            per_channel_burst: default_per_channel_burst(),
            per_channel_window_secs: default_per_channel_window_secs(),
        }
    }
}

/// Historical Analyzer configuration (spec.md §4.J).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: u64,
    #[serde(default = "default_min_lift")]
    pub min_lift: f64,
    #[serde(default = "default_fdr_alpha")]
    pub fdr_alpha: f64,
    #[serde(default = "default_run_at_utc_hour")]
    pub run_at_utc_hour: u32,
    /// Whether outcome computation gates on the tradeability check (spec.md
    /// §4.J step 4). Disabling it still emits an `Outcome` per timeframe,
    /// just without excluding illiquid/wide-spread bars from the
    /// `not_missed` denominator.
    #[serde(default = "default_tradeability_enabled")]
    pub tradeability_enabled: bool,
}

fn default_lookback_days() -> u32 {
    30
}
fn default_min_occurrences() -> u64 {
    5
}
fn default_min_lift() -> f64 {
    2.0
}
fn default_fdr_alpha() -> f64 {
    0.05
}
fn default_run_at_utc_hour() -> u32 {
    2
}
fn default_tradeability_enabled() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            min_occurrences: default_min_occurrences(),
            min_lift: default_min_lift(),
            fdr_alpha: default_fdr_alpha(),
            run_at_utc_hour: default_run_at_utc_hour(),
            tradeability_enabled: default_tradeability_enabled(),
        }
    }
}

/// Heartbeat & Admin configuration (spec.md §4.K).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeartbeatConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_admin_webhook_url")]
    pub admin_webhook_url: String,
}

fn default_interval_secs() -> u64 {
    900
}
fn default_admin_webhook_url() -> String {
    String::new()
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            admin_webhook_url: default_admin_webhook_url(),
        }
    }
}

/// Top-level configuration aggregate, loaded from TOML and overlaid with
/// environment variables for secrets (webhook URLs, API keys).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}
