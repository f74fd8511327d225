use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::core::metrics;
use crate::core::redis::RedisHealth;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let api = state.settings().api();
    Json(RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        api_prefix: api.api_prefix.clone(),
    })
}

pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut status = "healthy";
    let mut components = BTreeMap::new();

    match state.redis().health().await {
        RedisHealth::Healthy => {
            components.insert("redis", "healthy".to_string());
        }
        RedisHealth::Disconnected => {
            components.insert("redis", "disconnected".to_string());
        }
        RedisHealth::Unhealthy(error) => {
            components.insert("redis", format!("unhealthy: {error}"));
            status = "degraded";
        }
    }

    match repositories::health::ping(state.db()).await {
        Ok(()) => {
            components.insert("database", "healthy".to_string());
        }
        Err(err) => {
            components.insert("database", format!("unhealthy: {err}"));
            status = "unhealthy";
        }
    }

    Json(HealthResponse { service: "examhall-api".to_string(), status, components })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
