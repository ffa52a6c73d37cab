//! Loan workflows: borrowed listings, lending, renewal, return.
//!
//! Renewal dates are bounded: never in the past, never more than four
//! weeks out. The form proposes three weeks out by default.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::copy::{BookCopy, LoanedCopy},
    repository::Repository,
};

/// Borrowed listings show 10 copies per page
pub const LOANS_PER_PAGE: i64 = 10;

/// Hard limit on how far a renewal may move the due date
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Default loan period, also the proposed renewal date offset
pub const DEFAULT_LOAN_WEEKS: i64 = 3;

/// Renewal date proposed to the librarian
pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(DEFAULT_LOAN_WEEKS)
}

/// Validate a submitted renewal date against the bounded window
pub fn validate_renewal_date(date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date < today {
        return Err(AppError::validation(
            "renewal_date",
            "Invalid date - renewal in past",
        ));
    }
    if date > today + Duration::weeks(MAX_RENEWAL_WEEKS) {
        return Err(AppError::validation(
            "renewal_date",
            "Invalid date - renewal more than 4 weeks ahead",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies currently on loan to one user, ascending due date
    pub async fn borrowed_by_user(
        &self,
        user_id: i32,
        page: i64,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository
            .copies
            .borrowed_by_user(user_id, page, LOANS_PER_PAGE)
            .await
    }

    /// All copies on loan, across borrowers, ascending due date
    pub async fn all_borrowed(&self, page: i64) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository.copies.all_borrowed(page, LOANS_PER_PAGE).await
    }

    /// Lend a copy to a borrower. Without an explicit due date the
    /// default loan period applies.
    pub async fn loan_copy(
        &self,
        copy_id: Uuid,
        borrower_id: i32,
        due_back: Option<NaiveDate>,
    ) -> AppResult<BookCopy> {
        self.repository.users.get_by_id(borrower_id).await?;

        let due = due_back
            .unwrap_or_else(|| Utc::now().date_naive() + Duration::weeks(DEFAULT_LOAN_WEEKS));
        self.repository.copies.loan(copy_id, borrower_id, due).await
    }

    /// Data for the renewal form: the copy plus the proposed new due date
    pub async fn renewal_form(&self, copy_id: Uuid) -> AppResult<(BookCopy, NaiveDate)> {
        let copy = self.repository.copies.get_by_id(copy_id).await?;
        Ok((copy, proposed_renewal_date(Utc::now().date_naive())))
    }

    /// Renew a loan to the submitted date, subject to the bounded window
    pub async fn renew(&self, copy_id: Uuid, renewal_date: NaiveDate) -> AppResult<BookCopy> {
        validate_renewal_date(renewal_date, Utc::now().date_naive())?;
        self.repository.copies.renew(copy_id, renewal_date).await
    }

    /// Mark a copy returned
    pub async fn mark_returned(&self, copy_id: Uuid) -> AppResult<BookCopy> {
        self.repository.copies.mark_returned(copy_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn renewal_in_past_is_rejected() {
        let err = validate_renewal_date(today() - Duration::days(1), today()).unwrap_err();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "renewal_date");
                assert_eq!(message, "Invalid date - renewal in past");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn renewal_more_than_four_weeks_ahead_is_rejected() {
        let err = validate_renewal_date(today() + Duration::days(29), today()).unwrap_err();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "renewal_date");
                assert_eq!(message, "Invalid date - renewal more than 4 weeks ahead");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn renewal_today_is_accepted() {
        assert!(validate_renewal_date(today(), today()).is_ok());
    }

    #[test]
    fn renewal_at_exactly_four_weeks_is_accepted() {
        assert!(validate_renewal_date(today() + Duration::weeks(4), today()).is_ok());
    }

    #[test]
    fn renewal_anywhere_inside_the_window_is_accepted() {
        for days in 0..=28 {
            assert!(
                validate_renewal_date(today() + Duration::days(days), today()).is_ok(),
                "day offset {} should be accepted",
                days
            );
        }
    }

    #[test]
    fn proposed_date_is_three_weeks_out() {
        assert_eq!(proposed_renewal_date(today()), today() + Duration::days(21));
    }
}
