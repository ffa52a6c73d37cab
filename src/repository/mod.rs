//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod languages;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub genres: genres::GenresRepository,
    pub languages: languages::LanguagesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            languages: languages::LanguagesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Offset of a 1-based page into a LIMIT/OFFSET query
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_offset(1, 10), 0);
    }

    #[test]
    fn second_page_skips_one_page() {
        // 13 rows at 10 per page: page 1 holds 10, page 2 the remaining 3
        assert_eq!(page_offset(2, 10), 10);
    }

    #[test]
    fn page_below_one_is_clamped() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-3, 10), 0);
    }
}
