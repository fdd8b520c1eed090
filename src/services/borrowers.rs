//! Borrower management service

use crate::{
    error::AppResult,
    models::borrower::{Borrower, CreateBorrower, UpdateBorrower},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowersService {
    repository: Repository,
}

impl BorrowersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all borrowers
    pub async fn list(&self) -> AppResult<Vec<Borrower>> {
        self.repository.borrowers.list().await
    }

    /// Get borrower by ID
    pub async fn get(&self, id: i32) -> AppResult<Borrower> {
        self.repository.borrowers.get_by_id(id).await
    }

    /// Create a new borrower
    pub async fn create(&self, borrower: CreateBorrower) -> AppResult<Borrower> {
        self.repository.borrowers.create(&borrower).await
    }

    /// Update a borrower
    pub async fn update(&self, id: i32, borrower: UpdateBorrower) -> AppResult<Borrower> {
        self.repository.borrowers.update(id, &borrower).await
    }

    /// Delete a borrower
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.borrowers.delete(id).await
    }
}
