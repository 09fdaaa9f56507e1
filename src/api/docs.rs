//! `GET /openapi.json`
//!
//! Self-describing API document listing every horoscope endpoint and its
//! query parameters under the configured base path.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;

use super::AppState;
use crate::models::Period;

const DESCRIPTION: &str = "Daily, weekly and monthly horoscope readings for each zodiac sign, \
    scraped from horoscope.com and cached for the period they cover.";

fn sign_parameter() -> Value {
    json!({
        "name": "sign",
        "in": "query",
        "required": true,
        "description": "Zodiac sign name, case-insensitive (e.g. Aries)",
        "schema": { "type": "string" }
    })
}

fn day_parameter() -> Value {
    json!({
        "name": "day",
        "in": "query",
        "required": true,
        "description": "TODAY, TOMORROW, YESTERDAY or a past date as YYYY-MM-DD",
        "schema": { "type": "string" }
    })
}

fn data_schema(period: Period) -> Value {
    match period {
        Period::Daily => json!({
            "type": "object",
            "properties": {
                "date": { "type": "string" },
                "horoscope_data": { "type": "string" }
            }
        }),
        Period::Weekly => json!({
            "type": "object",
            "properties": {
                "week": { "type": "string" },
                "horoscope_data": { "type": "string" }
            }
        }),
        Period::Monthly => json!({
            "type": "object",
            "properties": {
                "month": { "type": "string" },
                "horoscope_data": { "type": "string" },
                "standout_days": { "type": "string" },
                "challenging_days": { "type": "string" }
            }
        }),
    }
}

fn operation(period: Period) -> Value {
    let parameters = match period {
        Period::Daily => vec![sign_parameter(), day_parameter()],
        Period::Weekly | Period::Monthly => vec![sign_parameter()],
    };

    json!({
        "get": {
            "tags": ["horoscope"],
            "summary": format!("Get the {period} horoscope for a zodiac sign"),
            "parameters": parameters,
            "responses": {
                "200": {
                    "description": "Reading for the current period",
                    "content": {
                        "application/json": {
                            "schema": {
                                "type": "object",
                                "properties": {
                                    "success": { "type": "boolean" },
                                    "status": { "type": "integer" },
                                    "data": data_schema(period)
                                }
                            }
                        }
                    }
                },
                "400": { "description": "Missing or malformed parameter" },
                "404": { "description": "No such zodiac sign exists" },
                "502": { "description": "horoscope.com is unavailable" }
            }
        }
    })
}

/// Builds the document for routes mounted under `base_path`.
#[must_use]
pub fn openapi_document(base_path: &str) -> Value {
    let base = base_path.trim_end_matches('/');

    let mut paths = serde_json::Map::new();
    for period in Period::ALL {
        paths.insert(
            format!("{base}/get-horoscope/{period}"),
            operation(period),
        );
    }
    paths.insert(
        "/healthcheck".to_string(),
        json!({
            "get": {
                "tags": ["health"],
                "summary": "Probe every horoscope endpoint and the cache",
                "responses": {
                    "200": { "description": "All endpoints healthy" },
                    "503": { "description": "At least one endpoint or the cache is unhealthy" }
                }
            }
        }),
    );

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Horoscope API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": DESCRIPTION,
            "license": { "name": "MIT" }
        },
        "paths": paths
    })
}

pub async fn openapi_json(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(openapi_document(&state.config().server.base_path))
}
