//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
    services::authors::AUTHORS_PER_PAGE,
};

use super::{delete_flow_response, AuthenticatedUser, PaginatedResponse};

/// Delete confirmation payload
#[derive(Serialize, ToSchema)]
pub struct DeleteConfirmation {
    pub message: String,
    /// Route to POST to in order to confirm the delete
    pub confirm_path: String,
}

/// List authors, ordered by name, 10 per page
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Author listing", body = PaginatedResponse<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let page = query.page.unwrap_or(1);
    let (authors, total) = state.services.authors.list(page).await?;

    Ok(Json(PaginatedResponse::new(
        authors,
        total,
        page,
        AUTHORS_PER_PAGE,
    )))
}

/// Get author details
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing author-management permission")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_manage_authors()?;
    request.validate()?;

    let author = state.services.authors.create(request).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 403, description = "Missing author-management permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    claims.require_manage_authors()?;
    request.validate()?;

    let author = state.services.authors.update(id, request).await?;
    Ok(Json(author))
}

/// Delete confirmation step for an author
#[utoipa::path(
    get,
    path = "/authors/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Confirmation data", body = DeleteConfirmation),
        (status = 403, description = "Missing author-management permission"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn confirm_delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteConfirmation>> {
    claims.require_manage_authors()?;

    let author = state.services.authors.get(id).await?;
    Ok(Json(DeleteConfirmation {
        message: format!("Delete author {}?", author.display_name()),
        confirm_path: format!("/api/v1/authors/{}/delete", id),
    }))
}

/// Delete an author. On success the response leaves for the author
/// listing; a storage failure sends the client back to the confirmation
/// step with the author intact.
#[utoipa::path(
    post,
    path = "/authors/{id}/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Deleted (redirect to listing) or storage failure (redirect to confirmation)"),
        (status = 403, description = "Missing author-management permission"),
        (status = 409, description = "Author still referenced by books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    claims.require_manage_authors()?;

    let result = state.services.authors.delete(id).await;
    Ok(delete_flow_response(
        result,
        &format!("/api/v1/authors/{}/delete", id),
        "/api/v1/authors",
    ))
}
