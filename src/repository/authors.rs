//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor, UpdateAuthor},
};

use super::page_offset;

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// List authors ordered by name, one page at a time
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        let authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors ORDER BY last_name, first_name LIMIT $1 OFFSET $2",
        )
        .bind(per_page)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok((authors, total))
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an author
    pub async fn update(&self, id: i32, update: &UpdateAuthor) -> AppResult<Author> {
        let current = self.get_by_id(id).await?;

        let updated = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2, date_of_birth = $3, date_of_death = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(update.first_name.as_ref().unwrap_or(&current.first_name))
        .bind(update.last_name.as_ref().unwrap_or(&current.last_name))
        .bind(update.date_of_birth.or(current.date_of_birth))
        .bind(update.date_of_death.or(current.date_of_death))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete an author. Rejected while any book still references it,
    /// so no dangling book references can appear.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let referencing_books: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if referencing_books > 0 {
            return Err(AppError::DeleteRestricted(format!(
                "Author is referenced by {} book(s)",
                referencing_books
            )));
        }

        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
