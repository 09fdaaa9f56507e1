//! Prometheus exposition and per-request logging.
//!
//! Request metrics are labelled by endpoint and horoscope period rather than
//! raw path, so unknown paths collapse into a single `unmatched` series.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::AppState;
use crate::models::Period;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.prometheus_handle {
        Some(handle) => handle.render(),
        None => "# metrics disabled\n".to_string(),
    }
}

/// `(endpoint, period)` labels for a request path.
fn route_labels(path: &str) -> (&'static str, &'static str) {
    if let Some((_, tail)) = path.rsplit_once("/get-horoscope/") {
        return match tail.parse::<Period>() {
            Ok(period) => ("get-horoscope", period.as_str()),
            Err(_) => ("unmatched", "none"),
        };
    }

    match path {
        "/healthcheck" => ("healthcheck", "none"),
        "/metrics" => ("metrics", "none"),
        "/openapi.json" => ("openapi", "none"),
        _ => ("unmatched", "none"),
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let (endpoint, period) = route_labels(req.uri().path());
    let method = req.method().clone();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %req.uri().path(),
        endpoint,
        period,
    );

    async move {
        let response = next.run(req).await;
        let elapsed = started.elapsed();
        let status = response.status();

        let labels = [
            ("method", method.to_string()),
            ("endpoint", endpoint.to_string()),
            ("period", period.to_string()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(
                event = "http_request_finished",
                status_code = status.as_u16(),
                duration_ms,
                "Request failed"
            );
        } else {
            info!(
                event = "http_request_finished",
                status_code = status.as_u16(),
                duration_ms,
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}
