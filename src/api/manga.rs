use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_entry_id;
use crate::models::{MangaEntry, MangaPatch, NewManga};

pub async fn list_manga(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MangaEntry>>>, ApiError> {
    let manga = state.catalog_service().list_manga().await;
    Ok(Json(ApiResponse::success(manga)))
}

pub async fn get_manga(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MangaEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let manga = state.catalog_service().get_manga(&id).await?;
    Ok(Json(ApiResponse::success(manga)))
}

pub async fn add_manga(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewManga>,
) -> Result<(StatusCode, Json<ApiResponse<MangaEntry>>), ApiError> {
    let manga = state.catalog_service().add_manga(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(manga))))
}

pub async fn update_manga(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<MangaPatch>,
) -> Result<Json<ApiResponse<MangaEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let manga = state.catalog_service().patch_manga(&id, patch).await?;
    Ok(Json(ApiResponse::success(manga)))
}

pub async fn toggle_finished(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MangaEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let manga = state.catalog_service().toggle_manga_finished(&id).await?;
    Ok(Json(ApiResponse::success(manga)))
}

pub async fn remove_manga(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_entry_id(&id)?;
    state.catalog_service().delete_manga(&id).await?;
    Ok(Json(ApiResponse::success(())))
}
