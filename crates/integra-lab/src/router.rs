//! Route table.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - allow all origins, the lab is a local teaching tool
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state.clone());

    // Documentation routes
    let docs_routes = Router::new()
        .route("/api/docs/search", get(handlers::docs::search))
        .route("/api/docs/patterns", get(handlers::docs::list_patterns))
        .route(
            "/api/docs/patterns/{pattern_id}",
            get(handlers::docs::get_pattern),
        )
        .route("/api/docs/glossary", get(handlers::docs::get_glossary))
        .route(
            "/api/docs/glossary/{term_id}",
            get(handlers::docs::get_term),
        )
        .route("/api/docs/pillars", get(handlers::docs::get_pillars))
        .route("/api/docs/stats", get(handlers::docs::get_stats))
        .route(
            "/api/docs/related/{module_id}",
            get(handlers::docs::get_related),
        )
        .with_state(state.docs.clone());

    // Sandbox routes
    let sandbox_routes = Router::new()
        .route("/api/sandbox/scenarios", get(handlers::sandbox::list))
        .route(
            "/api/sandbox/scenarios/{scenario_id}",
            get(handlers::sandbox::get),
        )
        .route(
            "/api/sandbox/scenarios/{scenario_id}/run",
            post(handlers::sandbox::run),
        )
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .merge(sandbox_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, DocsConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("patterns.json"),
            r#"{"patterns": [
                {"id": "api-gateway", "name": "API Gateway", "pillar": "applications",
                 "category": "Routing", "problem": "Too many endpoints.", "solution": "One entry point."},
                {"id": "cdc", "name": "CDC", "pillar": "data",
                 "problem": "Stale copies.", "solution": "Stream changes."}
            ]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("glossary.json"),
            r#"{"pillars": {"applications": {}, "events": {}, "data": {}},
                "terms": [{"id": "cdc", "term": "CDC", "pillar": "data", "definition": "Change data capture."}]}"#,
        )
        .unwrap();
        let state = AppState::new(AppConfig::default(), DocsConfig::with_dir(dir.path()));
        (dir, build_router(state))
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_search_route() {
        let (_dir, router) = app();
        let (status, body) = call(router.clone(), Method::GET, "/api/docs/search?q=api").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["type"], "pattern");
        assert_eq!(body[0]["id"], "api-gateway");

        let (status, body) = call(router, Method::GET, "/api/docs/search?q=a").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
    }

    #[tokio::test]
    async fn test_not_found_routes() {
        let (_dir, router) = app();
        let (status, body) = call(router.clone(), Method::GET, "/api/docs/patterns/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("ghost"));

        let (status, _) = call(router, Method::GET, "/api/docs/glossary/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_filter_and_stats_routes() {
        let (_dir, router) = app();
        let (_, body) = call(
            router.clone(),
            Method::GET,
            "/api/docs/patterns?pillar=applications",
        )
        .await;
        let patterns = body.as_array().unwrap();
        assert_eq!(patterns.len(), 1);
        assert!(patterns.iter().all(|p| p["pillar"] == "applications"));

        let (_, stats) = call(router.clone(), Method::GET, "/api/docs/stats").await;
        assert_eq!(stats["total_patterns"], 2);
        assert_eq!(stats["total_terms"], 1);

        let (status, related) = call(router.clone(), Method::GET, "/api/docs/related/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(related["patterns"][0]["id"], "cdc");
        assert_eq!(related["terms"][0]["id"], "cdc");

        let (status, body) = call(router, Method::GET, "/api/docs/related/abc").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
        assert!(body["error"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_sandbox_routes() {
        let (_dir, router) = app();
        let (status, descriptor) =
            call(router.clone(), Method::GET, "/api/sandbox/scenarios/CROSS-04").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(descriptor["steps"].as_array().unwrap().len(), 10);

        let (status, report) = call(
            router,
            Method::POST,
            "/api/sandbox/scenarios/CROSS-04/run",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["results"].as_array().unwrap().len(), 10);
        let trace = report["summary"]["trace_id"].as_str().unwrap().to_string();
        assert!(report["logs"]
            .as_array()
            .unwrap()
            .iter()
            .all(|entry| entry["trace_id"] == trace.as_str()));
        assert_eq!(report["results"][3]["event"]["trace_id"], trace.as_str());
    }
}
