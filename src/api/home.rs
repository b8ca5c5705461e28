use axum::{Json, extract::State};
use std::sync::Arc;

use super::{AddNoteRequest, ApiError, ApiResponse, AppState};
use crate::models::{CatalogDocument, HomeNote};
use crate::services::HomeView;

pub async fn get_home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HomeView>>, ApiError> {
    let home = state.catalog_service().home().await;
    Ok(Json(ApiResponse::success(home)))
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddNoteRequest>,
) -> Result<Json<ApiResponse<Vec<HomeNote>>>, ApiError> {
    let notes = state.catalog_service().add_home_note(&payload.text).await?;
    Ok(Json(ApiResponse::success(notes)))
}

/// The whole catalog document, mostly for backups.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<CatalogDocument>>, ApiError> {
    let document = state.catalog_service().document().await;
    Ok(Json(ApiResponse::success(document)))
}
