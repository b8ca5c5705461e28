use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_entry_id;
use crate::models::{AnimeEntry, AnimePatch, NewAnime};

pub async fn list_anime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnimeEntry>>>, ApiError> {
    let anime = state.catalog_service().list_anime().await;
    Ok(Json(ApiResponse::success(anime)))
}

pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AnimeEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let anime = state.catalog_service().get_anime(&id).await?;
    Ok(Json(ApiResponse::success(anime)))
}

pub async fn add_anime(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewAnime>,
) -> Result<(StatusCode, Json<ApiResponse<AnimeEntry>>), ApiError> {
    let anime = state.catalog_service().add_anime(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(anime))))
}

pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<AnimePatch>,
) -> Result<Json<ApiResponse<AnimeEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let anime = state.catalog_service().patch_anime(&id, patch).await?;
    Ok(Json(ApiResponse::success(anime)))
}

pub async fn toggle_finished(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AnimeEntry>>, ApiError> {
    let id = validate_entry_id(&id)?;
    let anime = state.catalog_service().toggle_anime_finished(&id).await?;
    Ok(Json(ApiResponse::success(anime)))
}

pub async fn remove_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_entry_id(&id)?;
    state.catalog_service().delete_anime(&id).await?;
    Ok(Json(ApiResponse::success(())))
}
