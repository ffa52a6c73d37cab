//! Business logic services

pub mod auth;
pub mod authors;
pub mod catalog;
pub mod loans;
pub mod sessions;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub authors: authors::AuthorsService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: sessions::SessionsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        sessions: sessions::SessionsService,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            authors: authors::AuthorsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
            sessions,
        }
    }
}
