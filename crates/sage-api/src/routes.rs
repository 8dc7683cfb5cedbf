use std::path::Path;

use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use tower_http::services::{ServeDir, ServeFile};

use sage_types::api::HealthResponse;

use crate::middleware::require_auth;
use crate::{AppState, auth, chat, history};

/// Full application router. `assets_dir` holds `templates/` (HTML pages)
/// and `static/` (served under `/static`).
pub fn router(state: AppState, assets_dir: &Path) -> Router {
    let public_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/health", get(health));

    let protected_routes = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/chat", post(chat::chat))
        .route("/api/history", get(history::list_sessions))
        .route("/api/history/{session_id}", get(history::session_messages))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(pages(assets_dir))
}

fn pages(assets_dir: &Path) -> Router {
    let templates = assets_dir.join("templates");

    Router::new()
        .route_service("/", ServeFile::new(templates.join("index.html")))
        .route_service("/login", ServeFile::new(templates.join("login.html")))
        .route_service("/register", ServeFile::new(templates.join("register.html")))
        .route_service("/history", ServeFile::new(templates.join("history.html")))
        .nest_service("/static", ServeDir::new(assets_dir.join("static")))
}

/// Liveness check, no auth.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "Sage".to_string(),
    })
}
