//! Borrowers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrower::{Borrower, CreateBorrower, UpdateBorrower},
};

#[derive(Clone)]
pub struct BorrowersRepository {
    pool: Pool<Postgres>,
}

impl BorrowersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all borrowers
    pub async fn list(&self) -> AppResult<Vec<Borrower>> {
        let borrowers = sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(borrowers)
    }

    /// Get borrower by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>("SELECT * FROM borrowers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrower with id {} not found", id)))
    }

    /// Create a new borrower
    pub async fn create(&self, borrower: &CreateBorrower) -> AppResult<Borrower> {
        let borrower = sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (name, contact, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.contact)
        .bind(&borrower.email)
        .bind(&borrower.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(borrower)
    }

    /// Find a borrower by name, creating one when no match exists.
    /// Contact details are only filled in on creation, never on match.
    pub async fn get_or_create(
        &self,
        name: &str,
        contact: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
    ) -> AppResult<Borrower> {
        let existing = sqlx::query_as::<_, Borrower>(
            "SELECT * FROM borrowers WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(borrower) = existing {
            return Ok(borrower);
        }

        let borrower = sqlx::query_as::<_, Borrower>(
            r#"
            INSERT INTO borrowers (name, contact, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(contact)
        .bind(email)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(borrower)
    }

    /// Update a borrower (partial semantics)
    pub async fn update(&self, id: i32, borrower: &UpdateBorrower) -> AppResult<Borrower> {
        sqlx::query_as::<_, Borrower>(
            r#"
            UPDATE borrowers
            SET name = COALESCE($1, name),
                contact = COALESCE($2, contact),
                email = COALESCE($3, email),
                address = COALESCE($4, address)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&borrower.name)
        .bind(&borrower.contact)
        .bind(&borrower.email)
        .bind(&borrower.address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrower with id {} not found", id)))
    }

    /// Delete a borrower and their borrowings (cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM borrowers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Borrower with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
