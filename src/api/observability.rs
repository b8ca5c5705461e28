//! Request logging and the Prometheus scrape endpoint.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::api::AppState;
use crate::constants::posters::PUBLIC_PREFIX;
use crate::domain::MediaKind;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Which part of the catalog a request touches. Used as the metrics label
/// instead of the raw path, which carries entry ids and section labels.
fn catalog_area(path: &str) -> &'static str {
    if path.starts_with(PUBLIC_PREFIX) {
        return "posters";
    }

    let mut segments = path.trim_start_matches('/').split('/');
    if segments.next() != Some("api") {
        return "static";
    }

    match (segments.next(), segments.next()) {
        (Some("anime"), _) => MediaKind::Anime.as_str(),
        (Some("manga"), _) => MediaKind::Manga.as_str(),
        (Some("years" | "top" | "search"), Some(kind)) => kind
            .parse::<MediaKind>()
            .map_or("unknown", |kind| kind.as_str()),
        (Some("home" | "db"), _) => "home",
        _ => "system",
    }
}

/// Wraps each request in a span and counts it per catalog area and status.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let area = catalog_area(&path);

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %path,
        area,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let elapsed = start.elapsed();

        metrics::counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "area" => area,
            "status" => status.as_u16().to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds", "area" => area)
            .record(elapsed.as_secs_f64());

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if matches!(area, "posters" | "static") && status.is_success() {
            debug!(status = status.as_u16(), elapsed_ms, "Served file");
        } else {
            info!(status = status.as_u16(), elapsed_ms, "Request finished");
        }

        response
    }
    .instrument(span)
    .await
}
