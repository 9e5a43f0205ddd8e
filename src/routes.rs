// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{self, commits, daily, logs},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the log, daily and commit APIs plus the log viewer page.
/// * Falls back to the static dashboard assets in `site_dir`.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let log_routes = Router::new().route("/", get(logs::get_log));

    let daily_routes = Router::new()
        .route("/", get(daily::list_daily))
        .route("/index", get(daily::get_daily_index));

    let commit_routes = Router::new()
        .route("/", get(commits::list_commits))
        .route("/{key}", get(commits::get_commits));

    let site = ServeDir::new(&state.config.site_dir);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/log", get(logs::log_page))
        .nest("/api/logs", log_routes)
        .nest("/api/daily", daily_routes)
        .nest("/api/commits", commit_routes)
        .fallback_service(site)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
