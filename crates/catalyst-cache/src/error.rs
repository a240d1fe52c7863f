use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("all providers exhausted for {symbol} {interval}")]
    AllProvidersExhausted { symbol: String, interval: String },

    #[error("disk cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("invalid bar data: {0}")]
    InvalidData(String),
}
