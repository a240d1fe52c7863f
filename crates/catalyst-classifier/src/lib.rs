pub mod classifier;
pub mod composition;
pub mod error;
pub mod float;
pub mod keywords;
pub mod offering;
pub mod regime;
pub mod rvol;
pub mod sector;
pub mod sentiment;
pub mod ticker;

pub use classifier::Classifier;
pub use error::ClassifierError;
pub use float::{classify_float_shares, float_multiplier, CachedFloatProvider, FloatProvider};
pub use keywords::{KeywordEntry, KeywordMatcher};
pub use offering::{detect_offering_severity, offering_penalty, CachedOfferingProvider, OfferingProvider};
pub use regime::{CachedRegimeProvider, RegimeProvider};
pub use rvol::RvolProvider;
pub use sector::{CachedSectorProvider, SectorProvider};
pub use sentiment::{NullSentimentAnalyzer, SentimentAnalyzer, VaderSentimentAnalyzer};
pub use ticker::extract_tickers;
