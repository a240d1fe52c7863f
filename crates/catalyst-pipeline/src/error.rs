use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dedup error: {0}")]
    Dedup(#[from] catalyst_dedup::DedupError),

    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dispatch http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dispatch middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("dispatch queue full, dropped oldest alert")]
    QueueOverflow,
}
