//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login
    pub async fn get_by_login(&self, login: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", login)))
    }

    /// Create a new user. `password_hash` is the already-hashed password.
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<User> {
        let duplicate: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
                .bind(&user.login)
                .fetch_one(&self.pool)
                .await?;

        if duplicate {
            return Err(AppError::Conflict("Login already taken".to_string()));
        }

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, firstname, lastname,
                               manage_authors, manage_books, mark_returned)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&user.login)
        .bind(password_hash)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(user.permissions.manage_authors)
        .bind(user.permissions.manage_books)
        .bind(user.permissions.mark_returned)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Delete a user. Their borrowed copies survive with the borrower
    /// reference cleared, inside the same transaction as the delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE book_copies SET borrower_id = NULL WHERE borrower_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
