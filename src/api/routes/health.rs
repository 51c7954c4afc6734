//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (dataset loaded)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::dataset::LoadOutcome;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the meal dataset loads with at least one row.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.load_dataset().await.is_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// The page stays usable without data, so a missing dataset is reported
/// as degraded rather than unhealthy.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let outcome = state.load_dataset().await;

    let dataset_status = match &outcome {
        LoadOutcome::Loaded(table) if table.is_empty() => "empty",
        LoadOutcome::Loaded(_) => "loaded",
        LoadOutcome::Missing { .. } => "missing",
        LoadOutcome::Failed { .. } => "failed",
    };

    let overall_status = if outcome.is_loaded() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        dataset: dataset_status.to_string(),
        sessions: state.sessions.count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
