//! Library model

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Library record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    /// Library name
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    /// Creation date (YYYY-MM-DD)
    #[serde(rename = "data_criacao")]
    #[sqlx(rename = "data_criacao")]
    pub created_on: NaiveDate,
}

/// Library annotated with the number of books it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryWithBookCount {
    pub id: i32,
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_criacao")]
    #[sqlx(rename = "data_criacao")]
    pub created_on: NaiveDate,
    #[serde(rename = "total_livros")]
    #[sqlx(rename = "total_livros")]
    pub book_count: i64,
}

/// Number of books owned by one library
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookCount {
    #[serde(rename = "biblioteca_id")]
    pub library_id: i32,
    #[serde(rename = "total_livros")]
    pub total: i64,
}

/// Creation date as sent by clients: a bare year or a date string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CreationDate {
    Year(i64),
    Text(String),
}

impl CreationDate {
    /// Resolve to a calendar date. A value without a `-` separator is a
    /// year and maps to January 1st of that year.
    pub fn normalize(&self) -> AppResult<NaiveDate> {
        let text = match self {
            CreationDate::Year(0) => return Err(AppError::missing_field("data_criacao")),
            CreationDate::Year(year) => year.to_string(),
            CreationDate::Text(text) => text.trim().to_string(),
        };

        if text.is_empty() {
            return Err(AppError::missing_field("data_criacao"));
        }

        let text = if text.contains('-') {
            text
        } else {
            format!("{}-01-01", text)
        };

        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(&text).map(|dt| dt.date_naive()))
            .map_err(|_| AppError::Validation(format!("data_criacao: invalid date '{}'", text)))
    }
}

/// Create or update library request (full replace)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct LibraryInput {
    #[serde(rename = "nome")]
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name cannot be empty")
    )]
    pub name: Option<String>,
    /// Creation date: a year (2023, "2023") or a date ("2023-05-10")
    #[serde(rename = "data_criacao")]
    #[validate(required(message = "Creation date is required"))]
    pub created_on: Option<CreationDate>,
}

impl LibraryInput {
    pub fn new(name: impl Into<String>, created_on: CreationDate) -> Self {
        Self {
            name: Some(name.into()),
            created_on: Some(created_on),
        }
    }

    /// Check required fields and normalize the creation date
    pub fn into_new_library(self) -> AppResult<NewLibrary> {
        self.validate()?;

        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::missing_field("nome"))?;
        let created_on = self
            .created_on
            .as_ref()
            .ok_or_else(|| AppError::missing_field("data_criacao"))?
            .normalize()?;

        Ok(NewLibrary { name, created_on })
    }
}

/// Validated library fields, ready for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLibrary {
    pub name: String,
    pub created_on: NaiveDate,
}
