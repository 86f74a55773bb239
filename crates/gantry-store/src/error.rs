/// Errors from store-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The textual identifier is neither 24 hex characters nor 12 raw bytes.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A lookup or delete matched zero documents.
    #[error("document not found")]
    NotFound,

    /// Any failure reported by the MongoDB driver.
    #[error("store error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
