//! Data models for the Biblos catalog

pub mod author;
pub mod book;
pub mod copy;
pub mod genre;
pub mod language;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookShort};
pub use copy::{BookCopy, CopyStatus};
pub use genre::Genre;
pub use language::Language;
pub use user::{User, UserClaims};
