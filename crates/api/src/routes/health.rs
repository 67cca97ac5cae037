use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// Whether the image storage root is reachable.
    pub storage_healthy: bool,
}

/// GET /health -- service, database, and image-storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = catalog_db::health_check(&state.pool).await.is_ok();
    let storage_healthy = tokio::fs::try_exists(&state.config.storage_root)
        .await
        .unwrap_or(false);

    Json(HealthResponse {
        status: overall_status(db_healthy, storage_healthy),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        storage_healthy,
    })
}

/// `degraded` when any dependency is down. The endpoint itself still
/// answers 200 so a probe can read the per-dependency fields.
fn overall_status(db_healthy: bool, storage_healthy: bool) -> &'static str {
    if db_healthy && storage_healthy {
        "ok"
    } else {
        "degraded"
    }
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_when_any_dependency_is_down() {
        assert_eq!(overall_status(true, true), "ok");
        assert_eq!(overall_status(false, true), "degraded");
        assert_eq!(overall_status(true, false), "degraded");
        assert_eq!(overall_status(false, false), "degraded");
    }
}
