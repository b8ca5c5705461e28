use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SearchQuery};
use crate::api::validation::validate_kind;
use crate::services::MetadataMatch;

/// `GET /api/search/{kind}?q=`
///
/// Proxies the metadata service. Upstream failures come back as an empty
/// list rather than an error.
pub async fn search_metadata(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<MetadataMatch>>>, ApiError> {
    let kind = validate_kind(&kind)?;
    let results = state.catalog_service().search_remote(kind, &query.q).await;
    Ok(Json(ApiResponse::success(results)))
}
