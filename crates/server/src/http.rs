//! HTTP routes
//!
//! - `POST <webhook_path>`: Telegram updates
//! - `GET /health`: liveness plus tracked user count
//! - `GET /metrics`: Prometheus text exposition

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use hr_assistant_config::constants::server::SECRET_TOKEN_HEADER;
use hr_assistant_core::AdapterError;

use crate::adapter::parse_update;
use crate::state::AppState;

pub fn create_router(state: AppState, webhook_path: &str, request_timeout: Duration) -> Router {
    Router::new()
        .route(webhook_path, post(webhook))
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Always answers 200 once authenticated so the platform does not redeliver
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    if let Some(expected) = &state.webhook_secret {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if provided != expected.as_str() {
            tracing::warn!("Webhook call with invalid secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("webhook", %request_id);

    match parse_update(&body) {
        Ok(event) => {
            state
                .controller
                .handle_and_dispatch(&event)
                .instrument(span)
                .await;
        }
        Err(AdapterError::Unsupported(reason)) => {
            tracing::debug!(%request_id, %reason, "Ignoring update");
        }
        Err(e) => {
            metrics::counter!("hr_assistant_events_total", "kind" => "malformed").increment(1);
            tracing::warn!(%request_id, error = %e, "Dropping malformed update");
        }
    }
    StatusCode::OK
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let tracked_users = match state.controller.store().len().await {
        Ok(n) => serde_json::json!(n),
        Err(e) => {
            tracing::warn!(error = %e, "Conversation store unavailable for health check");
            serde_json::Value::Null
        }
    };
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tracked_users": tracked_users,
    }))
}

async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
