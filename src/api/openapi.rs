//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, genres, health, index, languages, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblos API",
        version = "1.0.0",
        description = "Library catalog REST API: books, authors, copies, and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Index
        index::index,
        // Auth
        auth::login_form,
        auth::login,
        auth::me,
        // Books and copies
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        books::list_copies,
        books::create_copy,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::confirm_delete_author,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::delete_language,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::get_copy,
        loans::loan_copy,
        loans::renewal_form,
        loans::renew_loan,
        loans::return_copy,
        // Users
        users::create_user,
        users::get_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::LoginFormResponse,
            // Index
            index::IndexResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Copies
            crate::models::copy::BookCopy,
            crate::models::copy::LoanedCopy,
            crate::models::copy::CreateCopy,
            crate::models::copy::CopyStatus,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            authors::DeleteConfirmation,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            // Languages
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            // Loans
            loans::LoanRequest,
            loans::RenewRequest,
            loans::RenewalForm,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::Permissions,
            // Catalog summary
            crate::services::catalog::CatalogSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "index", description = "Catalog home and visit counter"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book and copy management"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "loans", description = "Borrowed listings and loan workflows"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
