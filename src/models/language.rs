//! Language model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Language a book is written in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

/// Create language request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLanguage {
    #[validate(length(min = 1, message = "Language name must not be empty"))]
    pub name: String,
}
