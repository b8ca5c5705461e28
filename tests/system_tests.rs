//! Integration tests for the system, search and static file surfaces.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use tsundoku::config::Config;
use tsundoku::domain::MediaKind;
use tsundoku::services::{MetadataMatch, MetadataProvider};
use tsundoku::state::SharedState;

struct Unreachable;

#[async_trait::async_trait]
impl MetadataProvider for Unreachable {
    async fn search(
        &self,
        _kind: MediaKind,
        _query: &str,
        _limit: usize,
    ) -> anyhow::Result<Vec<MetadataMatch>> {
        anyhow::bail!("dns error: failed to lookup address information")
    }
}

struct Many;

#[async_trait::async_trait]
impl MetadataProvider for Many {
    async fn search(
        &self,
        _kind: MediaKind,
        query: &str,
        _limit: usize,
    ) -> anyhow::Result<Vec<MetadataMatch>> {
        Ok((1..=10)
            .map(|i| MetadataMatch {
                mal_id: Some(i),
                title: format!("{query} {i}"),
                image_url: None,
                year: Some(2000 + i),
            })
            .collect())
    }
}

async fn spawn_app(provider: Arc<dyn MetadataProvider>) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.general.data_path = dir.path().join("data/db.json").display().to_string();
    config.general.posters_path = dir.path().join("public/posters").display().to_string();
    config.general.public_path = dir.path().join("public").display().to_string();
    config.metadata.cache_posters = false;

    let shared = SharedState::with_metadata_provider(config, provider)
        .await
        .expect("Failed to create shared state");
    let state = tsundoku::api::create_app_state(Arc::new(shared), None);
    (dir, tsundoku::api::router(state).await)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_system_status() {
    let (_dir, app) = spawn_app(Arc::new(Many)).await;

    let (status, body) = get_json(&app, "/api/system/status").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap_or(false));
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["data"]["anime_count"], 0);
    assert_eq!(body["data"]["manga_count"], 0);
}

#[tokio::test]
async fn test_missing_catalog_is_seeded_on_disk() {
    let (dir, app) = spawn_app(Arc::new(Many)).await;

    let written = std::fs::read_to_string(dir.path().join("data/db.json")).unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(on_disk["homeNotes"].as_array().unwrap().len(), 1);

    let (status, body) = get_json(&app, "/api/db").await;
    assert_eq!(status, StatusCode::OK);
    for key in ["anime", "manga", "topAnime", "topManga", "homeNotes", "yearSections"] {
        assert!(body["data"].get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn test_search_is_capped_and_blank_query_is_empty() {
    let (_dir, app) = spawn_app(Arc::new(Many)).await;

    let (status, body) = get_json(&app, "/api/search/anime?q=gintama").await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 6);
    assert_eq!(results[0]["title"], "gintama 1");

    let (_, body) = get_json(&app, "/api/search/manga?q=%20").await;
    assert_eq!(body["data"], serde_json::json!([]));

    let (_, body) = get_json(&app, "/api/search/manga").await;
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_search_fails_soft() {
    let (_dir, app) = spawn_app(Arc::new(Unreachable)).await;

    let (status, body) = get_json(&app, "/api/search/anime?q=frieren").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let (_dir, app) = spawn_app(Arc::new(Many)).await;

    let (status, body) = get(&app, "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("not enabled"));
}

#[tokio::test]
async fn test_static_files_and_posters_are_served() {
    let (dir, app) = spawn_app(Arc::new(Many)).await;

    let public = dir.path().join("public");
    write_file(&public.join("index.html"), b"<h1>tsundoku</h1>");
    write_file(&public.join("posters/anime/5.jpg"), b"jpeg");

    let (status, body) = get(&app, "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>tsundoku</h1>");

    let (status, body) = get(&app, "/posters/anime/5.jpg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"jpeg");

    let (status, _) = get(&app, "/posters/anime/404.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn write_file(path: &Path, contents: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}
