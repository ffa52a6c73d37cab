//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, User},
};

use super::AuthenticatedUser;

/// Register a library member or staff account
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 403, description = "Missing staff permission"),
        (status = 409, description = "Login already taken")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    claims.require_mark_returned()?;
    request.validate()?;

    let user = state.services.auth.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user details
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 403, description = "Missing staff permission"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    claims.require_mark_returned()?;

    let user = state.services.auth.get_user(id).await?;
    Ok(Json(user))
}

/// Delete a user. Copies they had on loan lose their borrower but stay
/// in the catalog.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Missing staff permission"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_mark_returned()?;

    state.services.auth.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
