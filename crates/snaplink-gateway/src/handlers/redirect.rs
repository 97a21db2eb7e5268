use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use snaplink_redirector::Visit;

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    match state.redirector().on_visit(&short_code).await? {
        Visit::Redirect {
            destination_url, ..
        } => Ok((StatusCode::FOUND, [(header::LOCATION, destination_url)]).into_response()),
        Visit::NotFound => Err(AppError::NotFound(format!("short code '{short_code}'"))),
    }
}
