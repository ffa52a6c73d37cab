//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book genre. Names are unique case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Create genre request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[validate(length(min = 1, max = 200, message = "Genre name must be 1-200 characters"))]
    pub name: String,
}

/// Case-insensitive comparison used for the genre uniqueness rule
pub fn names_collide(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_differing_only_in_case_collide() {
        assert!(names_collide("Fantasy", "fantasy"));
        assert!(names_collide("SCIENCE FICTION", "Science Fiction"));
    }

    #[test]
    fn distinct_names_do_not_collide() {
        assert!(!names_collide("Fantasy", "Poetry"));
    }
}
