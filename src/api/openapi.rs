//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{analytics, books, health, navigation, profiles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Library profiles, circulation and analytics REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Profiles
        profiles::create_profile,
        profiles::get_profile,
        profiles::update_profile,
        // Books
        books::add_book,
        books::list_available_books,
        books::borrow_book,
        books::return_book,
        // Analytics
        analytics::get_stats,
        analytics::recent_activities,
        analytics::log_activity,
        // Navigation
        navigation::check_navigation,
    ),
    components(
        schemas(
            crate::models::envelope::EnvelopeSchema,
            // Profiles
            crate::models::profile::UserProfile,
            crate::models::profile::CreateProfile,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::BorrowBook,
            // Analytics
            crate::models::activity::Activity,
            crate::models::stats::LibraryStats,
            // Navigation
            navigation::NavigationResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "profiles", description = "User profiles"),
        (name = "books", description = "Inventory and circulation"),
        (name = "analytics", description = "Statistics and activity log"),
        (name = "navigation", description = "Client route guard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
