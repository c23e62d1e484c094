//! API handlers for Biblioteca REST endpoints

pub mod books;
pub mod health;
pub mod libraries;
pub mod openapi;

use axum::{
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::AppState;

/// Confirmation body for updates and deletions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    /// Books removed along with a deleted library
    #[serde(rename = "livros_removidos", skip_serializing_if = "Option::is_none")]
    pub books_removed: Option<u64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            books_removed: None,
        }
    }
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
        // Libraries
        .route(
            "/bibliotecas",
            get(libraries::list_libraries).post(libraries::create_library),
        )
        .route("/bibliotecas/com-quantidade", get(libraries::list_libraries_with_book_counts))
        .route(
            "/bibliotecas/:id",
            get(libraries::get_library)
                .put(libraries::update_library)
                .delete(libraries::delete_library),
        )
        .route("/bibliotecas/:id/livros", get(libraries::list_library_books))
        .route("/bibliotecas/:id/livros/quantidade", get(libraries::count_library_books))
        // Books
        .route("/livros", get(books::list_books).post(books::create_book))
        .route(
            "/livros/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    // The original frontend calls the catalog routes without a prefix
    Router::new()
        .nest("/api/v1", api_v1.clone())
        .merge(api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
