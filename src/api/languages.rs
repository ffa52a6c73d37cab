//! Language endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::language::{CreateLanguage, Language},
};

use super::AuthenticatedUser;

/// List all languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    responses(
        (status = 200, description = "Language listing", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Get language details
#[utoipa::path(
    get,
    path = "/languages/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language details", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    let language = state.services.catalog.get_language(id).await?;
    Ok(Json(language))
}

/// Create a new language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 403, description = "Missing book-management permission")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLanguage>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_manage_books()?;
    request.validate()?;

    let language = state.services.catalog.create_language(request).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Delete a language. Rejected while books still reference it.
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 403, description = "Missing book-management permission"),
        (status = 404, description = "Language not found"),
        (status = 409, description = "Language still referenced by books")
    )
)]
pub async fn delete_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_manage_books()?;

    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
