//! Book copies repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{is_overdue_on, BookCopy, CopyStatus, CreateCopy, LoanedCopy},
};

use super::page_offset;

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by UUID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book copy {} not found", id)))
    }

    /// List copies of one book, ordered by due date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookCopy>> {
        let copies = sqlx::query_as::<_, BookCopy>(
            "SELECT * FROM book_copies WHERE book_id = $1 ORDER BY due_back",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Create a copy of a book. The id is generated here so copy
    /// identifiers stay non-sequential across the whole catalog.
    pub async fn create(&self, book_id: i32, copy: &CreateCopy) -> AppResult<BookCopy> {
        let created = sqlx::query_as::<_, BookCopy>(
            r#"
            INSERT INTO book_copies (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&copy.imprint)
        .bind(copy.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Copies on loan to one borrower, ascending due date
    pub async fn borrowed_by_user(
        &self,
        borrower_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_copies WHERE borrower_id = $1 AND status = 'o'",
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.book_id, c.imprint, c.due_back, c.borrower_id, c.status,
                   b.title AS book_title
            FROM book_copies c
            LEFT JOIN books b ON b.id = c.book_id
            WHERE c.borrower_id = $1 AND c.status = 'o'
            ORDER BY c.due_back
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(borrower_id)
        .bind(per_page)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok((Self::loaned_rows(rows)?, total))
    }

    /// All copies on loan, across borrowers, ascending due date
    pub async fn all_borrowed(&self, page: i64, per_page: i64) -> AppResult<(Vec<LoanedCopy>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE status = 'o'")
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query(
            r#"
            SELECT c.id, c.book_id, c.imprint, c.due_back, c.borrower_id, c.status,
                   b.title AS book_title
            FROM book_copies c
            LEFT JOIN books b ON b.id = c.book_id
            WHERE c.status = 'o'
            ORDER BY c.due_back
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(per_page)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok((Self::loaned_rows(rows)?, total))
    }

    fn loaned_rows(rows: Vec<sqlx::postgres::PgRow>) -> AppResult<Vec<LoanedCopy>> {
        let today = Utc::now().date_naive();
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let due_back: Option<NaiveDate> = row.get("due_back");
            result.push(LoanedCopy {
                id: row.get("id"),
                book_id: row.get("book_id"),
                book_title: row.get("book_title"),
                imprint: row.get("imprint"),
                due_back,
                borrower_id: row.get("borrower_id"),
                status: row.get("status"),
                is_overdue: is_overdue_on(due_back, today),
            });
        }
        Ok(result)
    }

    /// Put a copy on loan to a borrower until the given due date
    pub async fn loan(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookCopy> {
        let copy = self.get_by_id(id).await?;

        if copy.status == CopyStatus::OnLoan {
            return Err(AppError::Conflict("Copy is already on loan".to_string()));
        }

        let updated = sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE book_copies
            SET status = 'o', borrower_id = $1, due_back = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(borrower_id)
        .bind(due_back)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Move a copy's due date; the loan itself is untouched
    pub async fn renew(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookCopy> {
        let copy = self.get_by_id(id).await?;

        if copy.status != CopyStatus::OnLoan {
            return Err(AppError::Conflict("Copy is not on loan".to_string()));
        }

        let updated = sqlx::query_as::<_, BookCopy>(
            "UPDATE book_copies SET due_back = $1 WHERE id = $2 RETURNING *",
        )
        .bind(due_back)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Mark a copy returned: available again, borrower and due date cleared
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookCopy> {
        let copy = self.get_by_id(id).await?;

        if copy.status != CopyStatus::OnLoan {
            return Err(AppError::Conflict("Copy is not on loan".to_string()));
        }

        let updated = sqlx::query_as::<_, BookCopy>(
            r#"
            UPDATE book_copies
            SET status = 'a', borrower_id = NULL, due_back = NULL
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE status = 'a'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
