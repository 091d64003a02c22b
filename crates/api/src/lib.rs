//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for letters, routing, attachments and users
//! - Authentication middleware and role allow-lists
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use amanat_shared::{JwtService, LetterConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Codes embedded in minted letter numbers.
    pub letter_config: Arc<LetterConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use amanat_shared::JwtConfig;

    /// State with a disconnected database; enough for anything that fails before a query.
    fn offline_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            letter_config: Arc::new(LetterConfig::default()),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(offline_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_database_down() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "down");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_protected_route_rejects_bad_token() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/dispositions/inbox")
                .header(AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        let token = other
            .generate_access_token(uuid::Uuid::new_v4(), "ADMIN")
            .unwrap();

        let (status, _) = send(
            Request::builder()
                .uri("/api/v1/notifications")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
