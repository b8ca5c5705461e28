use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, DeclareSectionRequest, DeletedSectionDto};
use crate::api::validation::validate_kind;
use crate::domain::{MediaKind, Section};
use crate::models::{AnimeEntry, MangaEntry};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GroupedSections {
    Anime(Vec<Section<AnimeEntry>>),
    Manga(Vec<Section<MangaEntry>>),
}

pub async fn list_sections(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let labels = state.catalog_service().list_sections(kind).await;
    Ok(Json(ApiResponse::success(labels)))
}

pub async fn grouped_sections(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse<GroupedSections>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let service = state.catalog_service();
    let grouped = match kind {
        MediaKind::Anime => GroupedSections::Anime(service.grouped_anime().await),
        MediaKind::Manga => GroupedSections::Manga(service.grouped_manga().await),
    };
    Ok(Json(ApiResponse::success(grouped)))
}

pub async fn declare_section(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(payload): Json<DeclareSectionRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let labels = state
        .catalog_service()
        .declare_section(kind, &payload.year_label)
        .await?;
    Ok(Json(ApiResponse::success(labels)))
}

/// `DELETE /api/years/{kind}/{label}`
///
/// Removes every entry of `kind` filed under `label`. The client confirms
/// before calling.
pub async fn delete_section(
    State(state): State<Arc<AppState>>,
    Path((kind, label)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DeletedSectionDto>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let removed = state.catalog_service().delete_section(kind, &label).await?;
    Ok(Json(ApiResponse::success(DeletedSectionDto {
        label: label.trim().to_string(),
        removed,
    })))
}
