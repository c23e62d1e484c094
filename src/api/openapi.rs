//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, libraries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "0.1.0",
        description = "Library and book catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Libraries
        libraries::list_libraries,
        libraries::list_libraries_with_book_counts,
        libraries::get_library,
        libraries::create_library,
        libraries::update_library,
        libraries::delete_library,
        libraries::list_library_books,
        libraries::count_library_books,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Libraries
            crate::models::library::Library,
            crate::models::library::LibraryWithBookCount,
            crate::models::library::LibraryInput,
            crate::models::library::CreationDate,
            crate::models::library::BookCount,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            // Common
            crate::api::MessageResponse,
            health::HealthResponse,
            crate::config::StorageBackend,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "libraries", description = "Library management"),
        (name = "books", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
