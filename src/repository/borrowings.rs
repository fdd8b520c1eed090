//! Borrowings repository for database operations.
//!
//! The copy-count mutations run inside transactions: borrowing uses an
//! atomic conditional decrement so two concurrent borrows of the last copy
//! cannot both succeed, and returning increments with a clamp to
//! total_copies.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        borrower::Borrower,
        borrowing::{Borrowing, BorrowingDetails},
        category::Category,
    },
};

const DETAILS_QUERY: &str = r#"
    SELECT bg.id, bg.book_id, bg.borrower_id, bg.date_borrowed, bg.date_due,
           bg.date_returned, bg.fine_amount,
           b.title, b.author, b.isbn, b.category_id, b.shelf, b."row", b."column",
           b.total_copies, b.available_copies, b.cover, b.created_at,
           c.name AS category_name,
           br.name AS borrower_name, br.contact AS borrower_contact,
           br.email AS borrower_email, br.address AS borrower_address
    FROM borrowings bg
    JOIN books b ON bg.book_id = b.id
    LEFT JOIN categories c ON b.category_id = c.id
    JOIN borrowers br ON bg.borrower_id = br.id
"#;

fn details_from_row(row: &PgRow) -> BorrowingDetails {
    let category_id: Option<i32> = row.get("category_id");
    let category_name: Option<String> = row.get("category_name");

    BorrowingDetails {
        id: row.get("id"),
        book: Book {
            id: row.get("book_id"),
            title: row.get("title"),
            author: row.get("author"),
            isbn: row.get("isbn"),
            category_id,
            shelf: row.get("shelf"),
            row: row.get("row"),
            column: row.get("column"),
            total_copies: row.get("total_copies"),
            available_copies: row.get("available_copies"),
            cover: row.get("cover"),
            created_at: row.get("created_at"),
            category: category_id
                .zip(category_name)
                .map(|(id, name)| Category { id, name }),
        },
        borrower: Borrower {
            id: row.get("borrower_id"),
            name: row.get("borrower_name"),
            contact: row.get("borrower_contact"),
            email: row.get("borrower_email"),
            address: row.get("borrower_address"),
        },
        date_borrowed: row.get("date_borrowed"),
        date_due: row.get("date_due"),
        date_returned: row.get("date_returned"),
        fine_amount: row.get("fine_amount"),
    }
}

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrowing> {
        sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))
    }

    /// List all borrowings with book and borrower details, newest first
    pub async fn list(&self) -> AppResult<Vec<BorrowingDetails>> {
        let rows = sqlx::query(&format!("{} ORDER BY bg.id DESC", DETAILS_QUERY))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Get borrowing details by ID
    pub async fn get_details(&self, id: i32) -> AppResult<BorrowingDetails> {
        let row = sqlx::query(&format!("{} WHERE bg.id = $1", DETAILS_QUERY))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// Create a borrowing, decrementing the book's available copies.
    ///
    /// The decrement is conditional on a copy actually being available, so a
    /// borrow that loses the race on the last copy fails here even though
    /// the API layer already checked availability.
    pub async fn create(
        &self,
        book_id: i32,
        borrower_id: i32,
        loan_period_days: i64,
    ) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 \
             WHERE id = $1 AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(AppError::Validation(
                "No copies available for borrowing.".to_string(),
            ));
        }

        let now = Utc::now();
        let date_due = now + Duration::days(loan_period_days);

        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (book_id, borrower_id, date_borrowed, date_due)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(borrower_id)
        .bind(now)
        .bind(date_due)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(borrowing)
    }

    /// Return a borrowing: close it, record the fine, and put the copy back
    /// on the shelf (never past total_copies).
    pub async fn return_borrowing(
        &self,
        id: i32,
        date_returned: DateTime<Utc>,
        fee_per_day: Decimal,
    ) -> AppResult<Borrowing> {
        let mut tx = self.pool.begin().await?;

        let borrowing =
            sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Borrowing with id {} not found", id))
                })?;

        let outcome = borrowing.close(date_returned, fee_per_day)?;

        sqlx::query("UPDATE borrowings SET date_returned = $1, fine_amount = $2 WHERE id = $3")
            .bind(outcome.date_returned)
            .bind(outcome.fine_amount)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies) \
             WHERE id = $1",
        )
        .bind(borrowing.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Borrowing {
            date_returned: Some(outcome.date_returned),
            fine_amount: outcome.fine_amount,
            ..borrowing
        })
    }

    /// Delete a borrowing
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM borrowings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Borrowing with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
