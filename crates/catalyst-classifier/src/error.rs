use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("cache error: {0}")]
    Cache(#[from] catalyst_cache::CacheError),

    #[error("no ticker could be resolved for item {0}")]
    NoTicker(String),

    #[error("enrichment provider error: {0}")]
    Enrichment(String),
}
