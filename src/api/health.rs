//! `GET /healthcheck`
//!
//! Calls the three horoscope endpoints in-process for the configured probe
//! sign, pings the cache, and reports each one's status. It only observes;
//! nothing is retried or repaired.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;
use tracing::warn;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct EndpointHealth {
    pub status: &'static str,
    pub http_status: u16,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub cache: &'static str,
    pub endpoints: BTreeMap<&'static str, EndpointHealth>,
}

const fn label(healthy: bool) -> &'static str {
    if healthy { "healthy" } else { "unhealthy" }
}

async fn probe(state: Arc<AppState>, name: &'static str, uri: String) -> (&'static str, u16) {
    let request = match Request::builder().uri(&uri).body(Body::empty()) {
        Ok(request) => request,
        Err(e) => {
            warn!(endpoint = name, error = %e, "Failed to build health probe request");
            return (name, StatusCode::INTERNAL_SERVER_ERROR.as_u16());
        }
    };

    let status = match super::horoscope_routes()
        .with_state(state)
        .oneshot(request)
        .await
    {
        Ok(response) => response.status(),
        Err(never) => match never {},
    };

    if !status.is_success() {
        warn!(endpoint = name, status = status.as_u16(), "Health probe failed");
    }

    (name, status.as_u16())
}

pub async fn healthcheck(State(state): State<Arc<AppState>>) -> Response {
    let health = &state.config().health;
    let sign = health
        .sign()
        .map_or_else(|_| health.probe_sign.trim().to_string(), |sign| sign.key());

    let (cache, daily, weekly, monthly) = tokio::join!(
        state.horoscope().cache().ping(),
        probe(
            state.clone(),
            "daily",
            format!("/get-horoscope/daily?sign={sign}&day=TODAY"),
        ),
        probe(
            state.clone(),
            "weekly",
            format!("/get-horoscope/weekly?sign={sign}"),
        ),
        probe(
            state.clone(),
            "monthly",
            format!("/get-horoscope/monthly?sign={sign}"),
        ),
    );

    let endpoints: BTreeMap<_, _> = [daily, weekly, monthly]
        .into_iter()
        .map(|(name, http_status)| {
            (
                name,
                EndpointHealth {
                    status: label(http_status == StatusCode::OK.as_u16()),
                    http_status,
                },
            )
        })
        .collect();

    let cache_healthy = match cache {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Cache ping failed");
            false
        }
    };

    let healthy =
        cache_healthy && endpoints.values().all(|e| e.http_status == StatusCode::OK.as_u16());
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthReport {
            status: label(healthy),
            cache: label(cache_healthy),
            endpoints,
        }),
    )
        .into_response()
}
