use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::handlers::AppState;

/// Tracks application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call this on application startup)
pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running")),
    tag = "health"
)]
pub async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": get_uptime_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Readiness probe: both stores must be readable
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Stores readable"),
        (status = 503, description = "A store could not be read")
    ),
    tag = "health"
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let sales = state.services.sales.raw_csv().await;
    let recipes = state.services.recipes.list().await;

    let check = |err: Option<String>| match err {
        None => json!({ "status": "up" }),
        Some(error) => json!({ "status": "down", "error": error }),
    };
    let ready = sales.is_ok() && recipes.is_ok();
    let body = json!({
        "status": if ready { "ready" } else { "not_ready" },
        "checks": {
            "sales_store": check(sales.err().map(|e| e.to_string())),
            "recipe_store": check(recipes.err().map(|e| e.to_string())),
        },
        "response_time_ms": start.elapsed().as_millis() as u64,
    });

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
