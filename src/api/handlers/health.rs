//! Health check endpoint

use std::sync::OnceLock;
use std::time::Instant;

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

/// Record the service start time; called once during router construction.
pub fn mark_started() {
    let _ = STARTED_AT.set(Instant::now());
}

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the service is running
    pub status: String,
    /// Crate version (from Cargo.toml)
    pub version: String,
    /// Seconds since startup
    pub uptime_seconds: u64,
}

/// Service health check
///
/// No authorization required. Use for availability monitoring.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: STARTED_AT.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
    })
}
