//! User model, permissions and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Named capabilities beyond mere authentication. Every flag gates a
/// specific set of actions; authentication alone grants none of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permissions {
    /// Create, update and delete authors
    pub manage_authors: bool,
    /// Create, update and delete books, copies, genres and languages
    pub manage_books: bool,
    /// Loan, renew and mark copies returned; see the all-borrowed listing
    pub mark_returned: bool,
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub manage_authors: bool,
    pub manage_books: bool,
    pub mark_returned: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn permissions(&self) -> Permissions {
        Permissions {
            manage_authors: self.manage_authors,
            manage_books: self.manage_books,
            mark_returned: self.mark_returned,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(default)]
    pub permissions: Permissions,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: Permissions,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    pub fn require_manage_authors(&self) -> Result<(), AppError> {
        if self.permissions.manage_authors {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Author management permission required".to_string(),
            ))
        }
    }

    pub fn require_manage_books(&self) -> Result<(), AppError> {
        if self.permissions.manage_books {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Book management permission required".to_string(),
            ))
        }
    }

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        if self.permissions.mark_returned {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Mark-returned permission required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: Permissions) -> UserClaims {
        UserClaims {
            sub: "testuser".to_string(),
            user_id: 1,
            permissions,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn authentication_alone_grants_no_permission() {
        let claims = claims(Permissions::default());
        assert!(claims.require_manage_authors().is_err());
        assert!(claims.require_manage_books().is_err());
        assert!(claims.require_mark_returned().is_err());
    }

    #[test]
    fn held_permission_allows_the_action() {
        let claims = claims(Permissions {
            mark_returned: true,
            ..Default::default()
        });
        assert!(claims.require_mark_returned().is_ok());
        // Other gates stay closed
        assert!(claims.require_manage_books().is_err());
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let original = claims(Permissions {
            manage_authors: true,
            manage_books: false,
            mark_returned: true,
        });
        let token = original.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.user_id, original.user_id);
        assert_eq!(decoded.permissions, original.permissions);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = claims(Permissions::default()).create_token("secret-a").unwrap();
        assert!(UserClaims::from_token(&token, "secret-b").is_err());
    }
}
