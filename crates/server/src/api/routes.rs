use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Title search
        .route(
            "/recommend",
            get(handlers::recommend).post(handlers::recommend_form),
        )
        // Browsing
        .route("/search_by_genre", get(handlers::search_by_genre))
        .route(
            "/recommend_by_emotion",
            get(handlers::recommend_by_emotion).post(handlers::recommend_by_emotion_form),
        )
        .route("/search_by_age", get(handlers::search_by_age))
        .route("/movies_by_letter", post(handlers::movies_by_letter))
        .route("/genres", get(handlers::genres))
        // Metadata listings
        .route("/trending", get(handlers::trending))
        .route("/top_rated", get(handlers::top_rated))
        // Per-user views
        .route("/profile", get(handlers::profile))
        .route("/dashboard", get(handlers::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
