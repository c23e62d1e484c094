//! PostgreSQL catalog store

use async_trait::async_trait;
use sqlx::{error::ErrorKind, Pool, Postgres};

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, Library, LibraryWithBookCount, NewBook, NewLibrary},
};

#[derive(Clone)]
pub struct PgCatalog {
    pool: Pool<Postgres>,
}

impl PgCatalog {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Foreign key violations on `livros` mean the referenced library is gone
fn map_book_write_error(error: sqlx::Error, library_id: i32) -> AppError {
    let is_fk_violation = error
        .as_database_error()
        .map(|db| matches!(db.kind(), ErrorKind::ForeignKeyViolation))
        .unwrap_or(false);

    if is_fk_violation {
        AppError::Validation(format!("Library {} does not exist", library_id))
    } else {
        AppError::Database(error)
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn library_list(&self) -> AppResult<Vec<Library>> {
        let rows = sqlx::query_as::<_, Library>(
            "SELECT id, nome, data_criacao FROM libraries ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn library_get(&self, id: i32) -> AppResult<Library> {
        sqlx::query_as::<_, Library>("SELECT id, nome, data_criacao FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    async fn library_create(&self, data: &NewLibrary) -> AppResult<Library> {
        let row = sqlx::query_as::<_, Library>(
            r#"
            INSERT INTO libraries (nome, data_criacao)
            VALUES ($1, $2)
            RETURNING id, nome, data_criacao
            "#,
        )
        .bind(&data.name)
        .bind(data.created_on)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn library_update(&self, id: i32, data: &NewLibrary) -> AppResult<Library> {
        sqlx::query_as::<_, Library>(
            r#"
            UPDATE libraries SET nome = $1, data_criacao = $2
            WHERE id = $3
            RETURNING id, nome, data_criacao
            "#,
        )
        .bind(&data.name)
        .bind(data.created_on)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    async fn library_delete(&self, id: i32) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let books = sqlx::query("DELETE FROM livros WHERE biblioteca_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let library = sqlx::query("DELETE FROM libraries WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if library.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }

        tx.commit().await?;
        Ok(books.rows_affected())
    }

    async fn library_count_books(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM livros WHERE biblioteca_id = $1"
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn library_list_with_book_counts(&self) -> AppResult<Vec<LibraryWithBookCount>> {
        let rows = sqlx::query_as::<_, LibraryWithBookCount>(
            r#"
            SELECT b.id, b.nome, b.data_criacao, COUNT(l.id) AS total_livros
            FROM libraries b
            LEFT JOIN livros l ON b.id = l.biblioteca_id
            GROUP BY b.id, b.nome, b.data_criacao
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn book_list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, nome, autor, data_criacao, biblioteca_id FROM livros ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn book_list_for_library(&self, library_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, nome, autor, data_criacao, biblioteca_id FROM livros
            WHERE biblioteca_id = $1
            ORDER BY id
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn book_get(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, nome, autor, data_criacao, biblioteca_id FROM livros WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn book_create(&self, data: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO livros (nome, autor, data_criacao, biblioteca_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nome, autor, data_criacao, biblioteca_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .bind(data.library_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_book_write_error(e, data.library_id))
    }

    async fn book_update(&self, id: i32, data: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE livros SET nome = $1, autor = $2, data_criacao = $3, biblioteca_id = $4
            WHERE id = $5
            RETURNING id, nome, autor, data_criacao, biblioteca_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.year)
        .bind(data.library_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_book_write_error(e, data.library_id))?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn book_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM livros WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
