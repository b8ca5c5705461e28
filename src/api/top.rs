use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TopListRequest};
use crate::api::validation::validate_kind;
use crate::models::TopListItem;

pub async fn get_top_list(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<Vec<TopListItem>>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let list = state.catalog_service().top_list(kind).await;
    Ok(Json(ApiResponse::success(list)))
}

/// Replaces the list wholesale. Items past the tenth are dropped.
pub async fn set_top_list(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(payload): Json<TopListRequest>,
) -> Result<Json<ApiResponse<Vec<TopListItem>>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let list = state
        .catalog_service()
        .set_top_list(kind, payload.list)
        .await?;
    Ok(Json(ApiResponse::success(list)))
}
