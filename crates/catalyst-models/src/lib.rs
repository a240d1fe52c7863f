pub mod bar;
pub mod config;
pub mod event_record;
pub mod raw_item;
pub mod recommendation;
pub mod rejection;
pub mod scored_item;
pub mod outcome;

pub use bar::{bars_strictly_ordered, Bar, Interval};
pub use config::{
    AnalyzerConfig, CacheConfig, ClassifierConfig, DedupConfig, DispatchConfig, FeedsConfig,
    FilterConfig, HeartbeatConfig, SessionConfig, Settings,
};
pub use event_record::{AcceptedRecord, ClassificationSummary, RejectedRecord, JOURNAL_SCHEMA_VERSION};
pub use outcome::{Outcome, Timeframe, MISSED_OPPORTUNITY_RETURN_THRESHOLD};
pub use raw_item::{RawItem, CLOCK_SKEW_TOLERANCE_SECONDS};
pub use recommendation::{Evidence, KeywordRecommendation, RecommendationKind, RecommendationReport};
pub use rejection::RejectionReason;
pub use scored_item::{FloatClass, OfferingSeverity, Regime, ScoredItem};
