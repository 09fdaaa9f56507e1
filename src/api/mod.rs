use axum::{
    Json, Router,
    http::{HeaderValue, Uri, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::horoscope::HoroscopeClient;
use crate::config::{CacheBackend, Config};
use crate::db::Store;
use crate::services::{HoroscopeCache, HoroscopeService, MemoryHoroscopeCache, SeaOrmHoroscopeCache};
use metrics_exporter_prometheus::PrometheusHandle;

pub mod docs;
mod error;
pub mod health;
pub mod horoscope;
mod observability;
mod types;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub horoscope: HoroscopeService,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn horoscope(&self) -> &HoroscopeService {
        &self.horoscope
    }
}

/// Builds the cache selected by `cache.backend`.
pub async fn create_cache(config: &Config) -> anyhow::Result<Arc<dyn HoroscopeCache>> {
    let cache: Arc<dyn HoroscopeCache> = match config.cache.backend {
        CacheBackend::Sqlite => {
            let store = Store::with_pool_options(
                &config.general.database_path,
                config.general.max_db_connections,
                config.general.min_db_connections,
            )
            .await?;
            Arc::new(SeaOrmHoroscopeCache::new(store))
        }
        CacheBackend::Memory => Arc::new(MemoryHoroscopeCache::new()),
    };
    Ok(cache)
}

pub fn create_app_state(
    config: Config,
    cache: Arc<dyn HoroscopeCache>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let client = HoroscopeClient::new(&config.upstream)?;
    let horoscope = HoroscopeService::new(cache, client);

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        horoscope,
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let cache = create_cache(&config).await?;
    create_app_state(config, cache, prometheus_handle)
}

/// Routes under the configurable base path. Also called by the health check.
pub fn horoscope_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get-horoscope/daily", get(horoscope::get_daily))
        .route("/get-horoscope/weekly", get(horoscope::get_weekly))
        .route("/get-horoscope/monthly", get(horoscope::get_monthly))
}

pub fn router(state: Arc<AppState>) -> Router {
    let (base_path, cors_origins) = {
        let config = state.config();
        (
            config.server.base_path.trim_end_matches('/').to_string(),
            config.server.cors_allowed_origins.clone(),
        )
    };

    let routes = if base_path.is_empty() {
        Router::new().merge(horoscope_routes())
    } else {
        Router::new().nest(&base_path, horoscope_routes())
    };

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    routes
        .route("/healthcheck", get(health::healthcheck))
        .route("/metrics", get(observability::get_metrics))
        .route("/openapi.json", get(docs::openapi_json))
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::map_response(envelope_bare_errors))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

/// Wraps error responses produced outside the handlers (405, extractor
/// rejections) in the JSON envelope. JSON bodies pass through untouched.
async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Request failed");
    let mut wrapped = (
        status,
        Json(ApiResponse::<()>::error(status.as_u16(), message)),
    )
        .into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        wrapped.headers_mut().insert(header::ALLOW, allow.clone());
    }
    wrapped
}
