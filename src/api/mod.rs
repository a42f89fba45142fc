//! API handlers for Bookshelf REST endpoints

pub mod analytics;
pub mod books;
pub mod health;
pub mod navigation;
pub mod openapi;
pub mod profiles;

use std::path::PathBuf;

use axum::{
    extract::FromRequest,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{error::AppError, guard, AppState};

/// JSON body extractor whose rejections render as [`AppError`] (400)
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Unknown API routes
async fn api_not_found() -> AppError {
    AppError::NotFound("No such API route".to_string())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Profiles
        .route("/profiles", post(profiles::create_profile))
        .route("/profiles/by-user/:user_id", get(profiles::get_profile))
        .route("/profiles/:id", patch(profiles::update_profile))
        // Books
        .route("/books", post(books::add_book))
        .route("/books/available", get(books::list_available_books))
        .route("/books/:id/borrow", post(books::borrow_book))
        .route("/books/:id/return", post(books::return_book))
        // Analytics
        .route("/stats", get(analytics::get_stats))
        .route("/activities", post(analytics::log_activity))
        .route("/activities/recent", get(analytics::recent_activities))
        // Route guard
        .route("/navigation", get(navigation::check_navigation))
        .fallback(api_not_found)
        .with_state(state.clone());

    // Client pages, SPA fallback to index.html, behind the route guard
    let static_dir = PathBuf::from(&state.config.server.static_dir);
    let pages = Router::new()
        .fallback_service(
            ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html"))),
        )
        .layer(middleware::from_fn_with_state(state, guard::navigation_guard))
        .layer(CompressionLayer::new());

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .fallback_service(pages)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
