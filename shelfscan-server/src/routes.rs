//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

const DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:8081",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8081",
];

fn cors_layer(origins: Option<String>) -> CorsLayer {
    let allow_origin = match origins {
        Some(origins) if origins.trim() == "*" => AllowOrigin::any(),
        Some(origins) => AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect::<Vec<_>>(),
        ),
        // Local app development servers
        None => AllowOrigin::list(DEV_ORIGINS.iter().filter_map(|s| s.parse().ok())),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
///
/// `SHELFSCAN_CORS_ORIGINS` is a comma-separated origin list, or `*` for any.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(std::env::var("SHELFSCAN_CORS_ORIGINS").ok());

    let api_routes = Router::new()
        .route("/profiles", get(handlers::list_profiles))
        .route(
            "/profiles/:user_id",
            get(handlers::get_profile).delete(handlers::delete_profile),
        )
        .route("/profiles/:user_id/books", put(handlers::put_books))
        .route("/events", get(handlers::profile_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
