use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
