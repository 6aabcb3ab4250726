use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store has not been initialized")]
    NotInitialized,

    #[error("store has been closed")]
    Closed,

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
