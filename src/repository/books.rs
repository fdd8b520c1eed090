//! Books repository for database operations

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{adjusted_available_copies, Book, BookQuery, CreateBook, UpdateBook},
        category::Category,
    },
};

const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.author, b.isbn, b.category_id, b.shelf, b."row", b."column",
    b.total_copies, b.available_copies, b.cover, b.created_at,
    c.name AS category_name
"#;

fn book_from_row(row: &PgRow) -> Book {
    let category_id: Option<i32> = row.get("category_id");
    let category_name: Option<String> = row.get("category_name");

    Book {
        id: row.get("id"),
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
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, with its category loaded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM books b LEFT JOIN categories c ON b.category_id = c.id WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Ok(book_from_row(&row))
    }

    /// Search books with pagination, newest first.
    /// The search term matches title, author, and category name.
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let (rows, total) = if let Some(ref term) = query.search {
            let pattern = format!("%{}%", term.to_lowercase());

            let rows = sqlx::query(&format!(
                r#"
                SELECT {}
                FROM books b LEFT JOIN categories c ON b.category_id = c.id
                WHERE LOWER(b.title) LIKE $1 OR LOWER(b.author) LIKE $1 OR LOWER(c.name) LIKE $1
                ORDER BY b.created_at DESC
                LIMIT $2 OFFSET $3
                "#,
                BOOK_COLUMNS
            ))
            .bind(&pattern)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM books b LEFT JOIN categories c ON b.category_id = c.id
                WHERE LOWER(b.title) LIKE $1 OR LOWER(b.author) LIKE $1 OR LOWER(c.name) LIKE $1
                "#,
            )
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

            (rows, total)
        } else {
            let rows = sqlx::query(&format!(
                r#"
                SELECT {}
                FROM books b LEFT JOIN categories c ON b.category_id = c.id
                ORDER BY b.created_at DESC
                LIMIT $1 OFFSET $2
                "#,
                BOOK_COLUMNS
            ))
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
                .fetch_one(&self.pool)
                .await?;

            (rows, total)
        };

        Ok((rows.iter().map(book_from_row).collect(), total))
    }

    /// Check if an ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new book. available_copies always starts at total_copies,
    /// whatever the client sent.
    pub async fn create(&self, book: &CreateBook, cover: String) -> AppResult<Book> {
        let total_copies = book.total_copies.unwrap_or(1);

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author, isbn, category_id, shelf, "row", "column",
                               total_copies, available_copies, cover)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.category_id)
        .bind(book.shelf)
        .bind(book.row)
        .bind(book.column)
        .bind(total_copies)
        .bind(total_copies)
        .bind(cover)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update a book, adjusting available_copies when total_copies changes.
    /// The row is locked for the read-adjust-write.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let old_total: i32 = current.get("total_copies");
        let available: i32 = current.get("available_copies");
        let new_total = book.total_copies.unwrap_or(old_total);
        let new_available = adjusted_available_copies(available, old_total, new_total);

        sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, category_id = $4,
                shelf = $5, "row" = $6, "column" = $7,
                total_copies = $8, available_copies = $9, cover = $10
            WHERE id = $11
            "#,
        )
        .bind(book.title.clone().unwrap_or_else(|| current.get("title")))
        .bind(book.author.clone().unwrap_or_else(|| current.get("author")))
        .bind(book.isbn.clone().unwrap_or_else(|| current.get("isbn")))
        .bind(book.category_id.or_else(|| current.get("category_id")))
        .bind(book.shelf.or_else(|| current.get("shelf")))
        .bind(book.row.or_else(|| current.get("row")))
        .bind(book.column.or_else(|| current.get("column")))
        .bind(new_total)
        .bind(new_available)
        .bind(book.cover.clone().or_else(|| current.get("cover")))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Delete a book and its borrowings (cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
