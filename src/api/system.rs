//! System API endpoints.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

/// Returns catalog counts and runtime information.
///
/// # Endpoint
/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let document = state.catalog_service().document().await;
    let (metadata_enabled, data_path) = {
        let config = state.config().read().await;
        (config.metadata.enabled, config.general.data_path.clone())
    };

    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        anime_count: document.anime.len(),
        manga_count: document.manga.len(),
        finished_anime: document.anime.iter().filter(|a| a.finished).count(),
        finished_manga: document.manga.iter().filter(|m| m.finished).count(),
        metadata_enabled,
        data_path,
    };

    Ok(Json(ApiResponse::success(status)))
}
