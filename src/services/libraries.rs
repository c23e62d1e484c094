//! Libraries service

use crate::{
    error::AppResult,
    models::{BookCount, Library, LibraryInput, LibraryWithBookCount},
    repository::Repository,
};

#[derive(Clone)]
pub struct LibrariesService {
    repository: Repository,
}

impl LibrariesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check that the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.store.ping().await
    }

    pub async fn list(&self) -> AppResult<Vec<Library>> {
        self.repository.store.library_list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        self.repository.store.library_get(id).await
    }

    /// Create a library; a bare year is stored as January 1st of that year
    pub async fn create(&self, data: LibraryInput) -> AppResult<Library> {
        let data = data.into_new_library()?;
        let library = self.repository.store.library_create(&data).await?;
        tracing::info!(library_id = library.id, name = %library.name, "Library created");
        Ok(library)
    }

    /// Replace a library's name and creation date
    pub async fn update(&self, id: i32, data: LibraryInput) -> AppResult<Library> {
        let data = data.into_new_library()?;
        let library = self.repository.store.library_update(id, &data).await?;
        tracing::info!(library_id = id, "Library updated");
        Ok(library)
    }

    /// Delete a library together with its books. Returns the number of
    /// books removed.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let removed = self.repository.store.library_delete(id).await?;
        tracing::info!(library_id = id, books_removed = removed, "Library deleted");
        Ok(removed)
    }

    pub async fn count_books(&self, id: i32) -> AppResult<BookCount> {
        let total = self.repository.store.library_count_books(id).await?;
        Ok(BookCount {
            library_id: id,
            total,
        })
    }

    pub async fn list_with_book_counts(&self) -> AppResult<Vec<LibraryWithBookCount>> {
        self.repository.store.library_list_with_book_counts().await
    }
}
