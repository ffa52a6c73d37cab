//! Books repository for database operations.
//!
//! The genre relation is an explicit join table (`book_genres`) with
//! add/remove handled through full replacement inside the book's own
//! transaction.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookShort, CreateBook, UpdateBook},
    models::genre::Genre,
};

use super::page_offset;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID with its genres loaded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.genres = self.genres_for(id).await?;
        Ok(book)
    }

    async fn genres_for(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// List books ordered by title, one page at a time
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookShort>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books ORDER BY title LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        let mut shorts = Vec::with_capacity(books.len());
        for mut book in books {
            book.genres = self.genres_for(book.id).await?;
            shorts.push(BookShort {
                id: book.id,
                title: book.title.clone(),
                isbn: book.isbn.clone(),
                author_id: book.author_id,
                genre_display: book.display_genre(),
            });
        }

        Ok((shorts, total))
    }

    /// Create a new book with its genre links
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let duplicate: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(&book.isbn)
                .fetch_one(&self.pool)
                .await?;

        if duplicate {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, summary, isbn, language_id, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.language_id)
        .bind(book.author_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &book.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_by_id(created.id).await
    }

    /// Update a book; replaces the genre set when one is provided
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        let current = self.get_by_id(id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE books
            SET title = $1, summary = $2, isbn = $3, language_id = $4, author_id = $5
            WHERE id = $6
            "#,
        )
        .bind(update.title.as_ref().unwrap_or(&current.title))
        .bind(update.summary.as_ref().unwrap_or(&current.summary))
        .bind(update.isbn.as_ref().unwrap_or(&current.isbn))
        .bind(update.language_id.or(current.language_id))
        .bind(update.author_id.or(current.author_id))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(genre_ids) = &update.genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Delete a book and its genre links. Rejected while copies of it
    /// still exist.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let copies: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE book_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if copies > 0 {
            return Err(AppError::DeleteRestricted(format!(
                "Book still has {} registered cop(ies)",
                copies
            )));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
