use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store corrupted, falling back to in-memory: {0}")]
    Corrupted(String),
}
