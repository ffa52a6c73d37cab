//! Languages repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::{CreateLanguage, Language},
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get language by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language with id {} not found", id)))
    }

    /// List all languages ordered by name
    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>("SELECT * FROM languages ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(languages)
    }

    /// Create a new language
    pub async fn create(&self, language: &CreateLanguage) -> AppResult<Language> {
        let created = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name) VALUES ($1) RETURNING *",
        )
        .bind(&language.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Delete a language. Rejected while any book still references it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let referencing_books: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE language_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if referencing_books > 0 {
            return Err(AppError::DeleteRestricted(format!(
                "Language is referenced by {} book(s)",
                referencing_books
            )));
        }

        sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
