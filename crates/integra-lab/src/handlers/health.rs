//! Health check endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Health status ("ok")
    pub status: String,
}

/// Detailed health check response for the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealthResponse {
    /// Overall health status ("ok" or "degraded")
    pub status: String,

    /// Whether both documentation files are present
    pub docs: String,

    /// Server uptime in seconds
    pub uptime_seconds: u64,

    /// Server version
    pub version: String,
}

/// Basic health check endpoint.
///
/// `GET /health`
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Detailed API health check endpoint.
///
/// `GET /api/health`
///
/// Missing documentation files report `degraded` but still answer 200:
/// the docs endpoints keep serving (empty) collections in that case.
pub async fn api_health(State(state): State<AppState>) -> Json<ApiHealthResponse> {
    let docs_present = state.docs.store().sources_present().await;

    Json(ApiHealthResponse {
        status: if docs_present { "ok" } else { "degraded" }.to_string(),
        docs: if docs_present { "available" } else { "missing" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DocsConfig};

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_api_health_degraded_without_docs() {
        let dir = tempfile::TempDir::new().unwrap();
        let state = AppState::new(AppConfig::default(), DocsConfig::with_dir(dir.path()));
        let response = api_health(State(state)).await;
        assert_eq!(response.status, "degraded");
        assert_eq!(response.docs, "missing");
    }
}
