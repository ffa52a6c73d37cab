//! Genres repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get genre by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    /// List all genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    /// Create a new genre. Names must be unique case-insensitively;
    /// a fold-equal duplicate gets its own message, distinct from a
    /// plain uniqueness violation.
    pub async fn create(&self, genre: &CreateGenre) -> AppResult<Genre> {
        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM genres WHERE LOWER(name) = LOWER($1))",
        )
        .bind(&genre.name)
        .fetch_one(&self.pool)
        .await?;

        if duplicate {
            return Err(AppError::Conflict(
                "Genre already exists (case insensitive match)".to_string(),
            ));
        }

        let created =
            sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING *")
                .bind(&genre.name)
                .fetch_one(&self.pool)
                .await?;

        Ok(created)
    }

    /// Count all genres
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
