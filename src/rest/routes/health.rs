//! Health check and status endpoints.

use axum::{extract::State, Json};

use crate::rest::dto::{HealthResponse, StatusResponse};
use crate::rest::state::ApiState;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Get service status with directory and wizard info
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Health",
    responses(
        (status = 200, description = "Service status with directory info", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_steps: state.wizard.total_steps(),
        listing_count: state.directory.listing_count().await,
        pending_count: state.directory.pending_count().await,
        active_sessions: state.sessions.session_count().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::directory::DirectoryStore;
    use crate::telemetry::NoopSink;
    use std::sync::Arc;

    fn make_state() -> ApiState {
        ApiState::new(
            Config::default(),
            DirectoryStore::in_memory(),
            Arc::new(NoopSink),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let resp = health().await;
        assert_eq!(resp.status, "ok");
        assert!(!resp.version.is_empty());
    }

    #[tokio::test]
    async fn test_status() {
        let resp = status(State(make_state())).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.total_steps, 4);
        assert_eq!(resp.listing_count, 0);
    }
}
