//! Catalog management service (books and categories)

use crate::{
    config::MediaConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        category::{Category, CategoryPayload},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    media: MediaConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, media: MediaConfig) -> Self {
        Self { repository, media }
    }

    // =========================================================================
    // Books
    // =========================================================================

    /// Search books with text filter and pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        self.check_category_reference(book.category_id).await?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(
                "Book with this ISBN already exists".to_string(),
            ));
        }

        let cover = book
            .cover
            .clone()
            .unwrap_or_else(|| self.media.default_cover.clone());

        self.repository.books.create(&book, cover).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        self.check_category_reference(book.category_id).await?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
        }

        self.repository.books.update(id, &book).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    async fn check_category_reference(&self, category_id: Option<i32>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            self.repository
                .categories
                .get_by_id(category_id)
                .await
                .map_err(|e| match e {
                    AppError::NotFound(_) => {
                        AppError::field("category_id", "Category not found.")
                    }
                    other => other,
                })?;
        }
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    /// Get category by ID
    pub async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    /// Create a new category with a unique name
    pub async fn create_category(&self, payload: CategoryPayload) -> AppResult<Category> {
        if self
            .repository
            .categories
            .name_exists(&payload.name, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Category with this name already exists".to_string(),
            ));
        }
        self.repository.categories.create(&payload).await
    }

    /// Update a category
    pub async fn update_category(&self, id: i32, payload: CategoryPayload) -> AppResult<Category> {
        if self
            .repository
            .categories
            .name_exists(&payload.name, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Category with this name already exists".to_string(),
            ));
        }
        self.repository.categories.update(id, &payload).await
    }

    /// Delete a category
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await
    }
}
