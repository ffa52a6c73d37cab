//! Book copy (physical borrowable item) model and related types.
//!
//! Copies carry a generated UUID primary key so identifiers are not
//! guessable across the catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Copy loan status. DB stores the single-char code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CopyStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl CopyStatus {
    /// Single-character code used in the database
    pub fn as_code(&self) -> &'static str {
        match self {
            CopyStatus::Maintenance => "m",
            CopyStatus::OnLoan => "o",
            CopyStatus::Available => "a",
            CopyStatus::Reserved => "r",
        }
    }
}

impl Default for CopyStatus {
    fn default() -> Self {
        CopyStatus::Maintenance
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(CopyStatus::Maintenance),
            "o" => Ok(CopyStatus::OnLoan),
            "a" => Ok(CopyStatus::Available),
            "r" => Ok(CopyStatus::Reserved),
            _ => Err(format!("Invalid copy status code: {}", s)),
        }
    }
}

// SQLx conversion: stored as a one-char text column
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim().parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_code().to_string(), buf)
    }
}

/// Pure overdue rule: overdue iff a due date exists and is strictly
/// before the reference day
pub fn is_overdue_on(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    matches!(due_back, Some(due) if due < today)
}

/// A specific physical copy of a book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
}

impl BookCopy {
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        is_overdue_on(self.due_back, today)
    }
}

/// Copy with book context for borrowed listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: CopyStatus,
    pub is_overdue: bool,
}

/// Create copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCopy {
    pub imprint: String,
    /// Initial status; defaults to maintenance like every new copy
    #[serde(default)]
    pub status: CopyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn due_date_before_today_is_overdue() {
        assert!(is_overdue_on(Some(today() - Duration::days(1)), today()));
        assert!(is_overdue_on(Some(today() - Duration::days(365)), today()));
    }

    #[test]
    fn due_date_today_is_not_overdue() {
        assert!(!is_overdue_on(Some(today()), today()));
    }

    #[test]
    fn due_date_after_today_is_not_overdue() {
        assert!(!is_overdue_on(Some(today() + Duration::days(1)), today()));
    }

    #[test]
    fn missing_due_date_is_not_overdue() {
        assert!(!is_overdue_on(None, today()));
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            CopyStatus::Maintenance,
            CopyStatus::OnLoan,
            CopyStatus::Available,
            CopyStatus::Reserved,
        ] {
            assert_eq!(status.as_code().parse::<CopyStatus>().unwrap(), status);
        }
    }

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(CopyStatus::default(), CopyStatus::Maintenance);
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        assert!("x".parse::<CopyStatus>().is_err());
    }
}
