//! Book (catalog entry) model and related types.
//!
//! A `Book` is the bibliographic record; physical borrowable copies are
//! modeled separately (see [`crate::models::copy`]).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::genre::Genre;

/// Number of genre names shown in list views
const GENRE_DISPLAY_LIMIT: usize = 3;

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
    pub author_id: Option<i32>,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    /// Comma-joined names of the first genres, bounded for list views
    pub fn display_genre(&self) -> String {
        self.genres
            .iter()
            .take(GENRE_DISPLAY_LIMIT)
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    /// Up to three genre names, comma-joined
    pub genre_display: String,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    #[serde(default)]
    pub summary: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
    pub language_id: Option<i32>,
    pub author_id: Option<i32>,
    /// Genres to associate (many-to-many)
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: Option<String>,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: Option<String>,
    pub language_id: Option<i32>,
    pub author_id: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
}

/// Book listing query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_genres(names: &[&str]) -> Book {
        Book {
            id: 1,
            title: "Book Title".to_string(),
            summary: "My book summary".to_string(),
            isbn: "9781234567890".to_string(),
            language_id: None,
            author_id: None,
            genres: names
                .iter()
                .enumerate()
                .map(|(i, n)| Genre {
                    id: i as i32 + 1,
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn display_genre_joins_names() {
        let book = book_with_genres(&["Fantasy", "Poetry"]);
        assert_eq!(book.display_genre(), "Fantasy, Poetry");
    }

    #[test]
    fn display_genre_is_bounded_to_three() {
        let book = book_with_genres(&["A", "B", "C", "D", "E"]);
        assert_eq!(book.display_genre(), "A, B, C");
    }

    #[test]
    fn display_genre_empty_without_genres() {
        let book = book_with_genres(&[]);
        assert_eq!(book.display_genre(), "");
    }

    #[test]
    fn isbn_shorter_than_13_characters_is_rejected() {
        let request = CreateBook {
            title: "Test Book".to_string(),
            summary: "Summary".to_string(),
            isbn: "12345".to_string(),
            language_id: None,
            author_id: None,
            genre_ids: vec![],
        };
        let errors = request.validate().unwrap_err();
        let isbn_errors = &errors.field_errors()["isbn"];
        assert_eq!(
            isbn_errors[0].message.as_deref(),
            Some("ISBN must be exactly 13 characters")
        );
    }

    #[test]
    fn isbn_of_exactly_13_characters_is_accepted() {
        let request = CreateBook {
            title: "Test Book".to_string(),
            summary: "Summary".to_string(),
            isbn: "9781234567890".to_string(),
            language_id: None,
            author_id: None,
            genre_ids: vec![],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn isbn_format_is_not_otherwise_validated() {
        // Only the length is checked; any 13 characters pass
        let request = CreateBook {
            title: "Test Book".to_string(),
            summary: String::new(),
            isbn: "ABCDEFGHIJKLM".to_string(),
            language_id: None,
            author_id: None,
            genre_ids: vec![],
        };
        assert!(request.validate().is_ok());
    }
}
