use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use gantry_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed identifier or a write request with no body. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Lookup or delete matched zero documents.
    #[error("not found")]
    NotFound,

    /// Any failure from the backing store.
    #[error("store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(id) => {
                ApiError::Validation(format!("invalid identifier: {id:?}"))
            }
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Mongo(e) => ApiError::Store(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            // The underlying error detail passes through unsanitized.
            // Known weakness, kept for parity with observed behavior.
            ApiError::Store(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response()
            }
            ApiError::Io(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
