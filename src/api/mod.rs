//! API handlers for the Biblos REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod index;
pub mod languages;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
    AppState,
};

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// List of items on this page
    pub items: Vec<T>,
    /// Total number of items
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Whether the listing spans more than one page
    pub is_paginated: bool,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
            is_paginated: total > per_page,
        }
    }
}

/// Extractor for authenticated user from JWT token.
///
/// Anonymous or stale-token requests behave like an anonymous browser
/// session: they are redirected to the login route with a `next`
/// parameter pointing back at the requested path.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let login_required = || AppError::LoginRequired {
            login_path: state.config.auth.login_path.clone(),
            next: parts.uri.path().to_string(),
        };

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(login_required)?;

        if !auth_header.starts_with("Bearer ") {
            return Err(login_required());
        }

        let token = &auth_header[7..];

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|_| login_required())?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Map a delete outcome to the response the confirmation flow expects:
/// success leaves for the listing, a storage failure sends the client
/// back to the confirmation step with the entity intact, anything else
/// (restricted delete, not found) surfaces as the error itself.
pub fn delete_flow_response(
    result: AppResult<()>,
    confirm_path: &str,
    success_path: &str,
) -> Response {
    match result {
        Ok(()) => Redirect::to(success_path).into_response(),
        Err(AppError::Database(e)) => {
            tracing::warn!("Delete failed, returning to confirmation: {:?}", e);
            Redirect::to(confirm_path).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[derive(Serialize, ToSchema)]
    struct Row {
        n: i32,
    }

    #[test]
    fn listing_larger_than_a_page_is_marked_paginated() {
        let items: Vec<Row> = (0..10).map(|n| Row { n }).collect();
        let response = PaginatedResponse::new(items, 13, 1, 10);
        assert!(response.is_paginated);
        assert_eq!(response.items.len(), 10);
    }

    #[test]
    fn listing_fitting_one_page_is_not_marked_paginated() {
        let items: Vec<Row> = (0..3).map(|n| Row { n }).collect();
        let response = PaginatedResponse::new(items, 3, 1, 10);
        assert!(!response.is_paginated);
    }

    #[test]
    fn successful_delete_redirects_to_listing() {
        let response = delete_flow_response(Ok(()), "/api/v1/books/3/delete", "/api/v1/books");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/api/v1/books");
    }

    #[test]
    fn storage_failure_redirects_back_to_confirmation() {
        let result = Err(AppError::Database(sqlx::Error::PoolClosed));
        let response = delete_flow_response(result, "/api/v1/books/3/delete", "/api/v1/books");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/api/v1/books/3/delete");
    }

    #[test]
    fn restricted_delete_stays_an_error() {
        let result = Err(AppError::DeleteRestricted("in use".to_string()));
        let response = delete_flow_response(result, "/api/v1/authors/1/delete", "/api/v1/authors");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
