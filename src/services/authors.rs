//! Author management service

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

/// Authors are listed 10 per page
pub const AUTHORS_PER_PAGE: i64 = 10;

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors ordered by name, paginated
    pub async fn list(&self, page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, AUTHORS_PER_PAGE).await
    }

    /// Get author by ID
    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    /// Update an author
    pub async fn update(&self, id: i32, update: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors.update(id, &update).await
    }

    /// Delete an author (restricted while books reference it)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }
}
