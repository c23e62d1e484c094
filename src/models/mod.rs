//! Data models for Biblioteca

pub mod book;
pub mod library;

// Re-export commonly used types
pub use book::{Book, BookInput, NewBook};
pub use library::{BookCount, CreationDate, Library, LibraryInput, LibraryWithBookCount, NewLibrary};
