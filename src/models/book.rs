//! Book model

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    #[serde(rename = "titulo")]
    #[sqlx(rename = "nome")]
    pub title: String,
    #[serde(rename = "autor")]
    #[sqlx(rename = "autor")]
    pub author: String,
    /// Publication year
    #[serde(rename = "ano_publicacao")]
    #[sqlx(rename = "data_criacao")]
    pub year: i32,
    /// Owning library
    #[serde(rename = "biblioteca_id")]
    #[sqlx(rename = "biblioteca_id")]
    pub library_id: i32,
}

/// Create or update book request (full replace, every field required)
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[serde(rename = "titulo")]
    #[validate(
        required(message = "Title is required"),
        length(min = 1, message = "Title cannot be empty")
    )]
    pub title: Option<String>,
    #[serde(rename = "autor")]
    #[validate(
        required(message = "Author is required"),
        length(min = 1, message = "Author cannot be empty")
    )]
    pub author: Option<String>,
    /// Publication year, as a number or numeric string
    #[serde(rename = "ano_publicacao")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[validate(
        required(message = "Publication year is required"),
        range(min = 1, message = "Publication year must be positive")
    )]
    pub year: Option<i32>,
    /// Owning library ID, as a number or numeric string
    #[serde(rename = "biblioteca_id")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[validate(
        required(message = "Library ID is required"),
        range(min = 1, message = "Library ID must be positive")
    )]
    pub library_id: Option<i32>,
}

impl BookInput {
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32, library_id: i32) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            year: Some(year),
            library_id: Some(library_id),
        }
    }

    /// Check that every field is present
    pub fn into_new_book(self) -> AppResult<NewBook> {
        self.validate()?;

        let title = non_blank(self.title).ok_or_else(|| AppError::missing_field("titulo"))?;
        let author = non_blank(self.author).ok_or_else(|| AppError::missing_field("autor"))?;
        let year = self.year.ok_or_else(|| AppError::missing_field("ano_publicacao"))?;
        let library_id = self
            .library_id
            .ok_or_else(|| AppError::missing_field("biblioteca_id"))?;

        Ok(NewBook {
            title,
            author,
            year,
            library_id,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated book fields, ready for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub library_id: i32,
}
