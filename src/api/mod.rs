use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::CatalogService;
use crate::state::SharedState;

mod anime;
mod error;
mod home;
mod manga;
mod observability;
mod search;
mod sections;
mod system;
mod top;
mod types;
mod validation;

pub use error::ApiError;
pub use sections::GroupedSections;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (posters_path, public_path, cors_origins) = {
        let config = state.config().read().await;
        (
            config.general.posters_path.clone(),
            config.general.public_path.clone(),
            config.server.cors_allowed_origins.clone(),
        )
    };

    let api_router = create_api_router().with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service(
            crate::constants::posters::PUBLIC_PREFIX,
            ServeDir::new(posters_path),
        )
        .fallback_service(ServeDir::new(public_path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/anime", get(anime::list_anime).post(anime::add_anime))
        .route(
            "/anime/{id}",
            get(anime::get_anime)
                .patch(anime::update_anime)
                .delete(anime::remove_anime),
        )
        .route(
            "/anime/{id}/toggle-finished",
            post(anime::toggle_finished),
        )
        .route("/manga", get(manga::list_manga).post(manga::add_manga))
        .route(
            "/manga/{id}",
            get(manga::get_manga)
                .patch(manga::update_manga)
                .delete(manga::remove_manga),
        )
        .route(
            "/manga/{id}/toggle-finished",
            post(manga::toggle_finished),
        )
        .route(
            "/years/{kind}",
            get(sections::list_sections).post(sections::declare_section),
        )
        .route("/years/{kind}/grouped", get(sections::grouped_sections))
        .route(
            "/years/{kind}/{label}",
            axum::routing::delete(sections::delete_section),
        )
        .route("/top/{kind}", get(top::get_top_list).post(top::set_top_list))
        .route("/home", get(home::get_home).post(home::add_note))
        .route("/db", get(home::get_document))
        .route("/search/{kind}", get(search::search_metadata))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
}
