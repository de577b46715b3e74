use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "issue-relay",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
///
/// Authenticated reports only need the reporter's own token, so the server is
/// always ready for those. Anonymous reports need the bot token; without it
/// the probe answers 503 so the instance is kept out of rotation.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let proxy_ready = state.proxy_ready();
    let (status, label, proxy_component) = if proxy_ready {
        (StatusCode::OK, "ready", "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "missing bot token")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "issue-relay",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": uptime_seconds(),
            "components": {
                "authenticated_reports": "ready",
                "proxy_reports": proxy_component,
            }
        })),
    )
}
