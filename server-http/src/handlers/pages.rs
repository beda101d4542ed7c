use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::Path;
use tracing::warn;

pub const DASHBOARD_FILE: &str = "brewfather-dashboard.html";
pub const SETUP_FILE: &str = "setup.html";

async fn serve_page(dir: &Path, file: &str, failure: &'static str) -> Response {
    let path = dir.join(file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], bytes).into_response(),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, failure).into_response()
        }
    }
}

/// GET / and GET /index.html
pub async fn dashboard_page(State(state): State<AppState>) -> Response {
    serve_page(&state.static_dir, DASHBOARD_FILE, "Error loading page").await
}

/// GET /setup.html
pub async fn setup_page(State(state): State<AppState>) -> Response {
    serve_page(&state.static_dir, SETUP_FILE, "Error loading setup page").await
}
