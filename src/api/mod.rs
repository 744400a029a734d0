//! HTTP API layer - JSON routes over the core marketplace operations.
//!
//! This module provides the axum router, the shared state handed to every handler,
//! and the error-to-response mapping. Handlers stay thin: they parse the request,
//! call into [`crate::core`], and serialize the result.

/// Error to HTTP response mapping
pub mod error;
/// JSON and query extractors with crate-error rejections
pub mod extract;
/// Route handlers grouped by resource
pub mod routes;

use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared data available to all handlers.
pub struct AppState {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Shared state handle passed to handlers
pub type SharedState = Arc<AppState>;

async fn health() -> &'static str {
    "ok"
}

/// Builds the complete API router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::products::router())
        .merge(routes::articles::router())
        .merge(routes::orders::router())
        .merge(routes::chats::router())
        .merge(routes::farm::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    use super::{AppState, SharedState, router};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router over the given test database. The returned state still gives tests
    /// direct access to the database through `state.database`.
    pub fn app(db: DatabaseConnection) -> (SharedState, Router) {
        let state = Arc::new(AppState::new(db));
        (Arc::clone(&state), router(state))
    }

    /// Sends one request and returns the status and parsed JSON body (`Null` if empty).
    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).expect("valid request"))
            .await
            .expect("infallible service");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
