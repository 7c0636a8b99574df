pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::services::IdeaService;

/// Shared application state. Everything in here is an explicitly
/// constructed handle built at startup and cloned into the router.
#[derive(Clone)]
pub struct AppState {
    pub ideas: IdeaService,
    pub config: Arc<AppConfig>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Idea routes: reads are public, mutations sit behind JWT auth
        .merge(idea_public_routes())
        .merge(idea_protected_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn idea_public_routes() -> Router<AppState> {
    use crate::handlers::ideas;

    Router::new()
        .route("/api/ideas", get(ideas::list))
        .route("/api/ideas/:id", get(ideas::get))
}

fn idea_protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::{delete, post, put};
    use crate::handlers::ideas;

    Router::new()
        .route("/api/ideas", post(ideas::create))
        .route("/api/ideas/:id", put(ideas::update))
        .route("/api/ideas/:id", delete(ideas::delete))
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Idea API",
        "version": version,
        "endpoints": {
            "list": "GET /api/ideas?_limit=N (public)",
            "get": "GET /api/ideas/:id (public)",
            "create": "POST /api/ideas (Bearer token required)",
            "update": "PUT /api/ideas/:id (Bearer token required)",
            "delete": "DELETE /api/ideas/:id (Bearer token required)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.ideas.ping().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
