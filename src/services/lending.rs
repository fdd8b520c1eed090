//! Lending service: the borrowing lifecycle.
//!
//! Borrower resolution, the loan period, and the late fee all live here;
//! the copy-count mutations themselves happen in the repository
//! transactions.

use crate::{
    config::LendingConfig,
    error::{AppError, AppResult},
    models::borrowing::{BorrowingDetails, CreateBorrowing, ReturnBorrowing},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// List all borrowings, newest first
    pub async fn list_borrowings(&self) -> AppResult<Vec<BorrowingDetails>> {
        self.repository.borrowings.list().await
    }

    /// Get borrowing details by ID
    pub async fn get_borrowing(&self, id: i32) -> AppResult<BorrowingDetails> {
        self.repository.borrowings.get_details(id).await
    }

    /// Create a borrowing.
    ///
    /// The borrower comes from `borrower_id` when given, otherwise from a
    /// get-or-create on `borrower_name` (contact details only fill in on
    /// creation). Neither is a validation error.
    pub async fn create_borrowing(&self, request: CreateBorrowing) -> AppResult<BorrowingDetails> {
        let borrower = if let Some(borrower_id) = request.borrower_id {
            self.repository
                .borrowers
                .get_by_id(borrower_id)
                .await
                .map_err(|e| match e {
                    AppError::NotFound(_) => AppError::field("borrower_id", "Borrower not found."),
                    other => other,
                })?
        } else if let Some(ref name) = request.borrower_name {
            self.repository
                .borrowers
                .get_or_create(
                    name,
                    request.borrower_contact.as_deref(),
                    request.borrower_email.as_deref(),
                    request.borrower_address.as_deref(),
                )
                .await?
        } else {
            return Err(AppError::field(
                "borrower_name",
                "Borrower Name or ID is required.",
            ));
        };

        let borrowing = self
            .repository
            .borrowings
            .create(request.book_id, borrower.id, self.config.loan_period_days)
            .await?;

        self.repository.borrowings.get_details(borrowing.id).await
    }

    /// Return a borrowing (the only allowed update)
    pub async fn return_borrowing(
        &self,
        id: i32,
        request: ReturnBorrowing,
    ) -> AppResult<BorrowingDetails> {
        let date_returned = request.date_returned.ok_or_else(|| {
            AppError::field(
                "date_returned",
                "Only setting 'date_returned' is allowed for updates (the Return action).",
            )
        })?;

        self.repository
            .borrowings
            .return_borrowing(id, date_returned, self.config.late_fee_per_day)
            .await?;

        self.repository.borrowings.get_details(id).await
    }

    /// Delete a borrowing
    pub async fn delete_borrowing(&self, id: i32) -> AppResult<()> {
        self.repository.borrowings.delete(id).await
    }
}
