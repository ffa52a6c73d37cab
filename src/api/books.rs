//! Book and copy endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort, CreateBook, UpdateBook},
        copy::{BookCopy, CreateCopy},
    },
    services::catalog::BOOKS_PER_PAGE,
};

use super::{authors::DeleteConfirmation, delete_flow_response, AuthenticatedUser, PaginatedResponse};

/// List books, ordered by title, 2 per page
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Book listing", body = PaginatedResponse<BookShort>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<BookShort>>> {
    let page = query.page.unwrap_or(1);
    let (books, total) = state.services.catalog.list_books(page).await?;

    Ok(Json(PaginatedResponse::new(books, total, page, BOOKS_PER_PAGE)))
}

/// Get book details with genres
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failure (e.g. ISBN length)"),
        (status = 303, description = "Not authenticated, redirected to login"),
        (status = 403, description = "Missing book-management permission"),
        (status = 409, description = "Duplicate ISBN")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_manage_books()?;
    request.validate()?;

    let book = state.services.catalog.create_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 403, description = "Missing book-management permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    claims.require_manage_books()?;
    request.validate()?;

    let book = state.services.catalog.update_book(id, request).await?;
    Ok(Json(book))
}

/// Delete confirmation step for a book
#[utoipa::path(
    get,
    path = "/books/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Confirmation data", body = DeleteConfirmation),
        (status = 403, description = "Missing book-management permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn confirm_delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<DeleteConfirmation>> {
    claims.require_manage_books()?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(DeleteConfirmation {
        message: format!("Delete book \"{}\"?", book.title),
        confirm_path: format!("/api/v1/books/{}/delete", id),
    }))
}

/// Delete a book. Same confirmation flow as authors: success leaves for
/// the listing, storage failure returns to the confirmation step.
#[utoipa::path(
    post,
    path = "/books/{id}/delete",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Deleted (redirect to listing) or storage failure (redirect to confirmation)"),
        (status = 403, description = "Missing book-management permission"),
        (status = 409, description = "Book still has copies")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    claims.require_manage_books()?;

    let result = state.services.catalog.delete_book(id).await;
    Ok(delete_flow_response(
        result,
        &format!("/api/v1/books/{}/delete", id),
        "/api/v1/books",
    ))
}

/// List the copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookCopy>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_copies(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookCopy>>> {
    let copies = state.services.catalog.list_copies(id).await?;
    Ok(Json(copies))
}

/// Register a new physical copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 403, description = "Missing book-management permission"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    claims.require_manage_books()?;

    let copy = state.services.catalog.create_copy(id, request).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}
