//! Library API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookCount, Library, LibraryInput, LibraryWithBookCount},
};

use super::MessageResponse;

/// List all libraries
#[utoipa::path(
    get,
    path = "/bibliotecas",
    tag = "libraries",
    responses(
        (status = 200, description = "Library list", body = Vec<Library>)
    )
)]
pub async fn list_libraries(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.services.libraries.list().await?;
    Ok(Json(libraries))
}

/// List all libraries with the number of books each one owns
#[utoipa::path(
    get,
    path = "/bibliotecas/com-quantidade",
    tag = "libraries",
    responses(
        (status = 200, description = "Libraries with book counts", body = Vec<LibraryWithBookCount>)
    )
)]
pub async fn list_libraries_with_book_counts(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LibraryWithBookCount>>> {
    let libraries = state.services.libraries.list_with_book_counts().await?;
    Ok(Json(libraries))
}

/// Get library by ID
#[utoipa::path(
    get,
    path = "/bibliotecas/{id}",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = Library),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_library(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Library>> {
    let library = state.services.libraries.get_by_id(id).await?;
    Ok(Json(library))
}

/// Create a library
#[utoipa::path(
    post,
    path = "/bibliotecas",
    tag = "libraries",
    request_body = LibraryInput,
    responses(
        (status = 201, description = "Library created", body = Library),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_library(
    State(state): State<crate::AppState>,
    payload: Result<Json<LibraryInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Library>)> {
    let Json(data) = payload?;
    let library = state.services.libraries.create(data).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Update a library
#[utoipa::path(
    put,
    path = "/bibliotecas/{id}",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    request_body = LibraryInput,
    responses(
        (status = 200, description = "Library updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_library(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<LibraryInput>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(data) = payload?;
    state.services.libraries.update(id, data).await?;
    Ok(Json(MessageResponse::new("Library updated")))
}

/// Delete a library and all of its books
#[utoipa::path(
    delete,
    path = "/bibliotecas/{id}",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library deleted", body = MessageResponse),
        (status = 404, description = "Library not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_library(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state.services.libraries.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Library deleted".to_string(),
        books_removed: Some(removed),
    }))
}

/// List the books of a library
#[utoipa::path(
    get,
    path = "/bibliotecas/{id}/livros",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Books owned by the library", body = Vec<Book>)
    )
)]
pub async fn list_library_books(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_for_library(id).await?;
    Ok(Json(books))
}

/// Count the books of a library
#[utoipa::path(
    get,
    path = "/bibliotecas/{id}/livros/quantidade",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Book count", body = BookCount)
    )
)]
pub async fn count_library_books(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookCount>> {
    let count = state.services.libraries.count_books(id).await?;
    Ok(Json(count))
}
