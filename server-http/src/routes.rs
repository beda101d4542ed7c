use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // The CORS layer answers every OPTIONS request on these routes.
    // `get` also answers HEAD unless HEAD has its own handler.
    let api = Router::new()
        .route(
            "/api/brewfather",
            get(handlers::get_batches)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/readings",
            get(handlers::get_readings)
                .head(handlers::method_not_allowed)
                .fallback(handlers::method_not_allowed),
        )
        .layer(cors);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Dashboard pages
        .route("/", get(handlers::dashboard_page))
        .route("/index.html", get(handlers::dashboard_page))
        .route("/setup.html", get(handlers::setup_page))
        .merge(api)
        .fallback(handlers::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
