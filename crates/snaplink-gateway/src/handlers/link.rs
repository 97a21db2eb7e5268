use crate::error::{AppError, Result};
use crate::model::{LinkResponse, SaveLinkRequest, SaveLinkResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snaplink_core::RecordId;
use snaplink_shortener::SaveParams;

pub async fn save_link_handler(
    Path(record_id): Path<u64>,
    State(state): State<AppState>,
    Json(request): Json<SaveLinkRequest>,
) -> Result<Json<SaveLinkResponse>> {
    let params = SaveParams {
        record_id: RecordId::new(record_id),
        destination_url: request.destination_url.clone(),
        requested_code: request.custom_code,
    };
    let outcome = state.shortener().on_save(params).await?;

    Ok(Json(SaveLinkResponse::new(
        outcome,
        request.destination_url,
        state.base_url(),
    )))
}

pub async fn get_link_handler(
    Path(record_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>> {
    let record_id = RecordId::new(record_id);
    let summary = state
        .shortener()
        .describe(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("link for record {record_id}")))?;

    Ok(Json(LinkResponse::new(summary, state.base_url())))
}

pub async fn delete_link_handler(
    Path(record_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let record_id = RecordId::new(record_id);
    if state.shortener().on_delete(record_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("link for record {record_id}")))
    }
}
