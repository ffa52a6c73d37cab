//! Genre endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre},
};

use super::AuthenticatedUser;

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genre listing", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Get genre details
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Genre>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(genre))
}

/// Create a new genre. Names colliding case-insensitively with an
/// existing genre are rejected with a dedicated message.
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 403, description = "Missing book-management permission"),
        (status = 409, description = "Genre already exists (case insensitive match)")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_manage_books()?;
    request.validate()?;

    let genre = state.services.catalog.create_genre(request).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}
