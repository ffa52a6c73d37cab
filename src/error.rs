//! Error types for the Biblos server

use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes exposed in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    NotAuthenticated = 2,
    NotAuthorized = 3,
    DbFailure = 4,
    NoSuchRecord = 5,
    Duplicate = 6,
    BadValue = 7,
    DeleteRestricted = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Anonymous access to a login-gated route. Carries the original
    /// path so the response can redirect to the login route with a
    /// `next` parameter pointing back at it.
    #[error("Login required for {next}")]
    LoginRequired { login_path: String, next: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Field-level validation failure, surfaced with the offending field
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Delete rejected because other records still reference the entity
    #[error("Delete restricted: {0}")]
    DeleteRestricted(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a field-level validation error
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first field error only
        for (field, field_errors) in errors.field_errors() {
            if let Some(err) = field_errors.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                return AppError::Validation {
                    field: field.to_string(),
                    message,
                };
            }
        }
        AppError::BadRequest("Validation failed".to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match &self {
            AppError::LoginRequired { login_path, next } => {
                let location = format!("{}?next={}", login_path, next);
                return (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response();
            }
            AppError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::NotAuthenticated,
                msg.clone(),
                None,
            ),
            AppError::Authorization(msg) => (
                StatusCode::FORBIDDEN,
                ErrorCode::NotAuthorized,
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoSuchRecord,
                msg.clone(),
                None,
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                message.clone(),
                Some(field.clone()),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone(), None)
            }
            AppError::DeleteRestricted(msg) => (
                StatusCode::CONFLICT,
                ErrorCode::DeleteRestricted,
                msg.clone(),
                None,
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            field,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects_with_next_parameter() {
        let err = AppError::LoginRequired {
            login_path: "/auth/login".to_string(),
            next: "/api/v1/loans/mine".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert_eq!(location, "/auth/login?next=/api/v1/loans/mine");
    }

    #[test]
    fn authorization_maps_to_forbidden() {
        let response = AppError::Authorization("no".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response =
            AppError::validation("isbn", "ISBN must be exactly 13 characters").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn restricted_delete_maps_to_conflict() {
        let response = AppError::DeleteRestricted("books reference this author".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
