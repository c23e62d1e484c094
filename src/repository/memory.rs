//! In-process catalog store

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, Library, LibraryWithBookCount, NewBook, NewLibrary},
};

#[derive(Debug, Default)]
struct Tables {
    libraries: BTreeMap<i32, Library>,
    books: BTreeMap<i32, Book>,
    next_library_id: i32,
    next_book_id: i32,
}

impl Tables {
    fn insert_library(&mut self, data: &NewLibrary) -> Library {
        self.next_library_id += 1;
        let library = Library {
            id: self.next_library_id,
            name: data.name.clone(),
            created_on: data.created_on,
        };
        self.libraries.insert(library.id, library.clone());
        library
    }

    fn insert_book(&mut self, data: &NewBook) -> Book {
        self.next_book_id += 1;
        let book = Book {
            id: self.next_book_id,
            title: data.title.clone(),
            author: data.author.clone(),
            year: data.year,
            library_id: data.library_id,
        };
        self.books.insert(book.id, book.clone());
        book
    }

    fn ensure_library(&self, library_id: i32) -> AppResult<()> {
        if self.libraries.contains_key(&library_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Library {} does not exist", library_id)))
        }
    }

    fn count_books(&self, library_id: i32) -> i64 {
        self.books
            .values()
            .filter(|book| book.library_id == library_id)
            .count() as i64
    }
}

/// Catalog kept in memory. Both tables sit behind one lock so that the
/// cascade delete is atomic and a book write checks its library under the
/// same guard it inserts with.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with three libraries and six books
    pub fn with_sample_data() -> Self {
        let mut tables = Tables::default();

        let libraries = [
            ("Biblioteca Central", (2023, 1, 15)),
            ("Biblioteca Municipal", (2023, 3, 22)),
            ("Biblioteca Escolar", (2023, 5, 10)),
        ];
        let mut ids = Vec::with_capacity(libraries.len());
        for (name, (y, m, d)) in libraries {
            let created_on = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
            let library = tables.insert_library(&NewLibrary {
                name: name.to_string(),
                created_on,
            });
            ids.push(library.id);
        }

        let books = [
            (0, "Dom Casmurro", "Machado de Assis", 1899),
            (0, "O Cortiço", "Aluísio Azevedo", 1890),
            (1, "Memórias Póstumas de Brás Cubas", "Machado de Assis", 1881),
            (2, "Vidas Secas", "Graciliano Ramos", 1938),
            (1, "Grande Sertão: Veredas", "João Guimarães Rosa", 1956),
            (0, "Macunaíma", "Mário de Andrade", 1928),
        ];
        for (owner, title, author, year) in books {
            tables.insert_book(&NewBook {
                title: title.to_string(),
                author: author.to_string(),
                year,
                library_id: ids[owner],
            });
        }

        Self {
            tables: RwLock::new(tables),
        }
    }
}

fn library_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Library {} not found", id))
}

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn library_list(&self) -> AppResult<Vec<Library>> {
        let tables = self.tables.read().await;
        Ok(tables.libraries.values().cloned().collect())
    }

    async fn library_get(&self, id: i32) -> AppResult<Library> {
        let tables = self.tables.read().await;
        tables
            .libraries
            .get(&id)
            .cloned()
            .ok_or_else(|| library_not_found(id))
    }

    async fn library_create(&self, data: &NewLibrary) -> AppResult<Library> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_library(data))
    }

    async fn library_update(&self, id: i32, data: &NewLibrary) -> AppResult<Library> {
        let mut tables = self.tables.write().await;
        let library = tables
            .libraries
            .get_mut(&id)
            .ok_or_else(|| library_not_found(id))?;
        library.name = data.name.clone();
        library.created_on = data.created_on;
        Ok(library.clone())
    }

    async fn library_delete(&self, id: i32) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.libraries.contains_key(&id) {
            return Err(library_not_found(id));
        }

        let before = tables.books.len();
        tables.books.retain(|_, book| book.library_id != id);
        let removed = (before - tables.books.len()) as u64;
        tables.libraries.remove(&id);

        Ok(removed)
    }

    async fn library_count_books(&self, id: i32) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.count_books(id))
    }

    async fn library_list_with_book_counts(&self) -> AppResult<Vec<LibraryWithBookCount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .libraries
            .values()
            .map(|library| LibraryWithBookCount {
                id: library.id,
                name: library.name.clone(),
                created_on: library.created_on,
                book_count: tables.count_books(library.id),
            })
            .collect())
    }

    async fn book_list(&self) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().cloned().collect())
    }

    async fn book_list_for_library(&self, library_id: i32) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .values()
            .filter(|book| book.library_id == library_id)
            .cloned()
            .collect())
    }

    async fn book_get(&self, id: i32) -> AppResult<Book> {
        let tables = self.tables.read().await;
        tables.books.get(&id).cloned().ok_or_else(|| book_not_found(id))
    }

    async fn book_create(&self, data: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.ensure_library(data.library_id)?;
        Ok(tables.insert_book(data))
    }

    async fn book_update(&self, id: i32, data: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Err(book_not_found(id));
        }
        tables.ensure_library(data.library_id)?;
        let book = tables.books.get_mut(&id).ok_or_else(|| book_not_found(id))?;
        book.title = data.title.clone();
        book.author = data.author.clone();
        book.year = data.year;
        book.library_id = data.library_id;
        Ok(book.clone())
    }

    async fn book_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| book_not_found(id))
    }
}
