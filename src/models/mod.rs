//! Data models for Librarium

pub mod book;
pub mod borrower;
pub mod borrowing;
pub mod category;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use borrower::{Borrower, CreateBorrower, UpdateBorrower};
pub use borrowing::{Borrowing, BorrowingDetails, BorrowingState, CreateBorrowing, ReturnBorrowing};
pub use category::{Category, CategoryPayload};
pub use user::{User, UserClaims};
