//! Books service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.store.book_list().await
    }

    /// Books owned by a library; empty when it has none or does not exist
    pub async fn list_for_library(&self, library_id: i32) -> AppResult<Vec<Book>> {
        self.repository.store.book_list_for_library(library_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.store.book_get(id).await
    }

    /// Create a book under an existing library
    pub async fn create(&self, data: BookInput) -> AppResult<Book> {
        let data = data.into_new_book()?;
        self.ensure_library_exists(&data).await?;

        let book = self.repository.store.book_create(&data).await?;
        tracing::info!(book_id = book.id, library_id = book.library_id, "Book created");
        Ok(book)
    }

    /// Replace every field of a book
    pub async fn update(&self, id: i32, data: BookInput) -> AppResult<Book> {
        let data = data.into_new_book()?;
        self.ensure_library_exists(&data).await?;

        let book = self.repository.store.book_update(id, &data).await?;
        tracing::info!(book_id = id, library_id = book.library_id, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.store.book_delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn ensure_library_exists(&self, data: &NewBook) -> AppResult<()> {
        match self.repository.store.library_get(data.library_id).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => Err(AppError::Validation(format!(
                "Library {} does not exist",
                data.library_id
            ))),
            Err(e) => Err(e),
        }
    }
}
