//! Book (catalog entry) model and related types.
//!
//! Copy accounting lives here as pure functions so the repository write
//! paths stay thin and the rules stay unit-testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::category::Category;

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(skip_serializing)]
    pub category_id: Option<i32>,
    pub shelf: Option<i32>,
    pub column: Option<i32>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub cover: Option<String>,
    pub created_at: DateTime<Utc>,
    // `row` is read last because sqlx's `FromRow` derive binds a local named
    // after each field; a field named `row` shadows the `from_row(row:)` param,
    // so any column read after it fails to compile. Keep it last (before the
    // skipped relation, which doesn't touch the row).
    pub row: Option<i32>,
    // Relation (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub category: Option<Category>,
}

/// Create book request. `available_copies` and `created_at` are
/// server-computed, so unknown fields are rejected outright.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: String,
    pub category_id: Option<i32>,
    #[validate(range(min = 1, message = "Shelf must be at least 1"))]
    pub shelf: Option<i32>,
    #[validate(range(min = 1, message = "Row must be at least 1"))]
    pub row: Option<i32>,
    #[validate(range(min = 1, message = "Column must be at least 1"))]
    pub column: Option<i32>,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
    pub cover: Option<String>,
}

/// Update book request. All fields optional; update and partial-update
/// share these semantics.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Author must be 1-255 characters"))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: Option<String>,
    pub category_id: Option<i32>,
    #[validate(range(min = 1, message = "Shelf must be at least 1"))]
    pub shelf: Option<i32>,
    #[validate(range(min = 1, message = "Row must be at least 1"))]
    pub row: Option<i32>,
    #[validate(range(min = 1, message = "Column must be at least 1"))]
    pub column: Option<i32>,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
    pub cover: Option<String>,
}

/// Book query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Text search over title, author, and category name
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// available_copies after total_copies changes from `old_total` to `new_total`.
///
/// Growth frees the new copies immediately; shrinking only clamps when the
/// available count would otherwise exceed the new total (excess loaned-out
/// copies are not reclaimed).
pub fn adjusted_available_copies(available: i32, old_total: i32, new_total: i32) -> i32 {
    let diff = new_total - old_total;
    if diff > 0 {
        available + diff
    } else if available > new_total {
        new_total
    } else {
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_total_frees_the_difference() {
        assert_eq!(adjusted_available_copies(2, 3, 5), 4);
        assert_eq!(adjusted_available_copies(0, 1, 4), 3);
    }

    #[test]
    fn shrinking_total_clamps_only_when_exceeded() {
        // 5 available of 5, shrink to 2: clamp down
        assert_eq!(adjusted_available_copies(5, 5, 2), 2);
        // 1 available of 5 (4 loaned out), shrink to 3: untouched
        assert_eq!(adjusted_available_copies(1, 5, 3), 1);
    }

    #[test]
    fn unchanged_total_leaves_available_alone() {
        assert_eq!(adjusted_available_copies(2, 4, 4), 2);
    }

    #[test]
    fn shrink_to_zero_empties_the_shelf() {
        assert_eq!(adjusted_available_copies(3, 3, 0), 0);
    }
}
