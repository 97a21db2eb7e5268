use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snaplink_core::StorageError;
use snaplink_redirector::RedirectorError;
use snaplink_shortener::ShortenerError;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Shortener(ShortenerError),
    Redirector(RedirectorError),
    NotFound(String),
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        AppError::Shortener(value)
    }
}

impl From<RedirectorError> for AppError {
    fn from(value: RedirectorError) -> Self {
        AppError::Redirector(value)
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::Conflict(_) => StatusCode::CONFLICT,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StorageError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        StorageError::Query(_) | StorageError::InvalidData(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(ShortenerError::InvalidUrl(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Shortener(
                ShortenerError::InvalidInput(_) | ShortenerError::InvalidShortCode(_),
            ) => StatusCode::BAD_REQUEST,
            AppError::Shortener(ShortenerError::CodeSpaceExhausted { .. }) => StatusCode::CONFLICT,
            AppError::Shortener(ShortenerError::Storage(e)) => storage_status(e),
            AppError::Redirector(RedirectorError::Storage(e)) => storage_status(e),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Shortener(e) => e.to_string(),
            AppError::Redirector(e) => e.to_string(),
            AppError::NotFound(what) => format!("{what} not found"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(status = %status, error = %message, "request failed");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
