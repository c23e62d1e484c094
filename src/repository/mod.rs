//! Repository layer: the catalog store and its backends

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, Library, LibraryWithBookCount, NewBook, NewLibrary},
};

pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

/// Storage for libraries and the books they own.
///
/// Implementations assign ids and report a missing target as
/// `AppError::NotFound`. A book write naming an unknown library fails with
/// `AppError::Validation`, checked atomically with the write.
/// `library_delete` removes the library and its books as one unit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the backing storage answers
    async fn ping(&self) -> AppResult<()>;

    async fn library_list(&self) -> AppResult<Vec<Library>>;

    async fn library_get(&self, id: i32) -> AppResult<Library>;

    async fn library_create(&self, data: &NewLibrary) -> AppResult<Library>;

    async fn library_update(&self, id: i32, data: &NewLibrary) -> AppResult<Library>;

    /// Delete a library and every book referencing it, returning how many
    /// books went with it. Nothing changes when the library is absent.
    async fn library_delete(&self, id: i32) -> AppResult<u64>;

    async fn library_count_books(&self, id: i32) -> AppResult<i64>;

    /// Every library with its book count, zero included
    async fn library_list_with_book_counts(&self) -> AppResult<Vec<LibraryWithBookCount>>;

    async fn book_list(&self) -> AppResult<Vec<Book>>;

    async fn book_list_for_library(&self, library_id: i32) -> AppResult<Vec<Book>>;

    async fn book_get(&self, id: i32) -> AppResult<Book>;

    async fn book_create(&self, data: &NewBook) -> AppResult<Book>;

    async fn book_update(&self, id: i32, data: &NewBook) -> AppResult<Book>;

    async fn book_delete(&self, id: i32) -> AppResult<()>;
}

/// Shared handle to the configured catalog store
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn CatalogStore>,
}

impl Repository {
    /// Repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::from_store(PgCatalog::new(pool))
    }

    /// Repository backed by an in-process store
    pub fn in_memory(catalog: MemoryCatalog) -> Self {
        Self::from_store(catalog)
    }

    pub fn from_store(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
