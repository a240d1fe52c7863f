use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] catalyst_pipeline::PipelineError),

    #[error("cache error: {0}")]
    Cache(#[from] catalyst_cache::CacheError),

    #[error("statistics error: {0}")]
    Stats(String),
}
