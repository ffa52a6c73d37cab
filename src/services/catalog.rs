//! Catalog management service: books, genres, languages, copies

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookShort, CreateBook, UpdateBook},
        copy::{BookCopy, CreateCopy},
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
    },
    repository::Repository,
};

/// Books are listed 2 per page
pub const BOOKS_PER_PAGE: i64 = 2;

/// Aggregate counts for the index view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_copies: i64,
    pub num_copies_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Books

    pub async fn list_books(&self, page: i64) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(page, BOOKS_PER_PAGE).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book; referenced author/language/genres must exist
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        if let Some(author_id) = book.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        if let Some(language_id) = book.language_id {
            self.repository.languages.get_by_id(language_id).await?;
        }
        for genre_id in &book.genre_ids {
            self.repository.genres.get_by_id(*genre_id).await?;
        }
        self.repository.books.create(&book).await
    }

    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        if let Some(author_id) = update.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }
        if let Some(language_id) = update.language_id {
            self.repository.languages.get_by_id(language_id).await?;
        }
        self.repository.books.update(id, &update).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // Copies

    pub async fn list_copies(&self, book_id: i32) -> AppResult<Vec<BookCopy>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.copies.list_for_book(book_id).await
    }

    pub async fn create_copy(&self, book_id: i32, copy: CreateCopy) -> AppResult<BookCopy> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.copies.create(book_id, &copy).await
    }

    pub async fn get_copy(&self, id: Uuid) -> AppResult<BookCopy> {
        self.repository.copies.get_by_id(id).await
    }

    // Genres

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        self.repository.genres.create(&genre).await
    }

    // Languages

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        self.repository.languages.create(&language).await
    }

    /// Delete a language (restricted while books reference it)
    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }

    // Index

    /// Counts shown on the index view
    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_copies: self.repository.copies.count().await?,
            num_copies_available: self.repository.copies.count_available().await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
        })
    }
}
