#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use horoscope_api::config::{CacheBackend, Config};
use horoscope_api::services::period;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tower::ServiceExt;

pub const DAILY_BODY: &str = "You will find clarity in an unexpected conversation.";
pub const WEEKLY_BODY: &str = "Plans come together - slowly, but they do.";
pub const MONTHLY_BODY: &str = "A month of steady progress.";

#[derive(Default)]
pub struct Upstream {
    pub hits: AtomicUsize,
    pub fail_monthly: AtomicBool,
    pub redesigned_weekly: AtomicBool,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn page(paragraph: &str) -> Html<String> {
    Html(format!(
        r#"<html><body><div class="main-horoscope"><p>{paragraph}</p></div></body></html>"#
    ))
}

async fn daily_today(State(upstream): State<Arc<Upstream>>) -> Html<String> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    page(&format!("<strong>Oct 19, 2026</strong> - {DAILY_BODY}"))
}

async fn daily_archive(State(upstream): State<Arc<Upstream>>) -> Html<String> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    page(&format!("<strong>May 1, 2024</strong> - {DAILY_BODY}"))
}

async fn weekly(State(upstream): State<Arc<Upstream>>) -> Html<String> {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.redesigned_weekly.load(Ordering::SeqCst) {
        return Html(
            r#"<html><body><div class="horoscope-v2"><p>Moved.</p></div></body></html>"#.to_string(),
        );
    }
    let week = period::current_week_range(Local::now().naive_local());
    page(&format!("<strong>{week}</strong> - {WEEKLY_BODY}"))
}

async fn monthly(State(upstream): State<Arc<Upstream>>) -> Response {
    upstream.hits.fetch_add(1, Ordering::SeqCst);
    if upstream.fail_monthly.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let month = period::current_month(Local::now().naive_local());
    page(&format!(
        "<strong>{month}</strong> - {MONTHLY_BODY}Good luck this month! Standout days: 3, 12, 21 Challenging days: 7, 15,"
    ))
    .into_response()
}

/// Serves horoscope.com shaped pages on an ephemeral local port.
pub async fn spawn_upstream() -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());
    let app = Router::new()
        .route("/horoscope-general-daily-today.aspx", get(daily_today))
        .route("/horoscope-general-daily-tomorrow.aspx", get(daily_today))
        .route("/horoscope-general-daily-yesterday.aspx", get(daily_today))
        .route("/horoscope-archive.aspx", get(daily_archive))
        .route("/horoscope-general-weekly.aspx", get(weekly))
        .route("/horoscope-general-monthly.aspx", get(monthly))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/"), upstream)
}

pub fn test_config(base_url: String, backend: CacheBackend) -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.upstream.base_url = base_url;
    config.cache.backend = backend;
    config.cache.purge_enabled = false;
    config.observability.metrics_enabled = false;
    config
}

pub async fn spawn_app(backend: CacheBackend) -> (Router, Arc<Upstream>) {
    spawn_app_with(backend, |_| {}).await
}

pub async fn spawn_app_with(
    backend: CacheBackend,
    customize: impl FnOnce(&mut Config),
) -> (Router, Arc<Upstream>) {
    let (base_url, upstream) = spawn_upstream().await;
    let mut config = test_config(base_url, backend);
    customize(&mut config);
    let state = horoscope_api::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (horoscope_api::api::router(state), upstream)
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
    send_json(app, "GET", uri).await
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Option<String>, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    (status, cache_control, json)
}
