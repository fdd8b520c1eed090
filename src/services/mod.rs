//! Business logic services

pub mod auth;
pub mod borrowers;
pub mod catalog;
pub mod lending;

use crate::{
    config::{AuthConfig, LendingConfig, MediaConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub borrowers: borrowers::BorrowersService,
    pub lending: lending::LendingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        media_config: MediaConfig,
        lending_config: LendingConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone(), media_config),
            borrowers: borrowers::BorrowersService::new(repository.clone()),
            lending: lending::LendingService::new(repository, lending_config),
        }
    }
}
