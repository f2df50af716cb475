//! REST exposure: health checks, the `/api` tree and HTTP middleware

use super::entity_registry::EntityRegistry;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Prefix every entity route is nested under
pub const API_PREFIX: &str = "/api";

/// REST API exposure
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - `/health` and `/healthz`
    /// - every registered entity's routes under [`API_PREFIX`]
    /// - any custom routes, merged at the root
    /// - request tracing and permissive CORS
    pub fn build_router(registry: &EntityRegistry, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().nest(API_PREFIX, registry.build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_health_routes() {
        let app = RestExposure::build_router(&EntityRegistry::new(), Vec::new());
        let server = TestServer::new(app).unwrap();

        for path in ["/health", "/healthz"] {
            let response = server.get(path).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["status"], "ok");
            assert_eq!(body["service"], "course-catalog");
        }
    }

    #[tokio::test]
    async fn test_custom_routes_are_merged_at_root() {
        let custom = Router::new().route("/ping", get(|| async { "pong" }));
        let app = RestExposure::build_router(&EntityRegistry::new(), vec![custom]);
        let server = TestServer::new(app).unwrap();

        server.get("/ping").await.assert_text("pong");
    }
}
