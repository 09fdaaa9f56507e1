mod common;

use axum::http::StatusCode;
use common::{get_json, spawn_app, spawn_app_with};
use horoscope_api::config::CacheBackend;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_healthcheck_healthy() {
    let (app, _) = spawn_app(CacheBackend::Memory).await;

    let (status, _, json) = get_json(&app, "/healthcheck").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache"], "healthy");
    for name in ["daily", "weekly", "monthly"] {
        assert_eq!(json["endpoints"][name]["status"], "healthy");
        assert_eq!(json["endpoints"][name]["http_status"], 200);
    }
}

#[tokio::test]
async fn test_healthcheck_reports_failing_endpoint() {
    let (app, upstream) = spawn_app(CacheBackend::Sqlite).await;
    upstream.fail_monthly.store(true, Ordering::SeqCst);

    let (status, _, json) = get_json(&app, "/healthcheck").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["endpoints"]["daily"]["status"], "healthy");
    assert_eq!(json["endpoints"]["monthly"]["status"], "unhealthy");
    assert_eq!(json["endpoints"]["monthly"]["http_status"], 502);
}

#[tokio::test]
async fn test_metrics_disabled() {
    let (app, _) = spawn_app(CacheBackend::Memory).await;

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/metrics")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_healthcheck_with_padded_health_sign() {
    let (app, _) = spawn_app_with(CacheBackend::Memory, |config| {
        config.health.probe_sign = " Aries ".to_string();
    })
    .await;

    let (status, _, json) = get_json(&app, "/healthcheck").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["endpoints"]["daily"]["status"], "healthy");
}
