//! Borrowing (loan transaction) model and related types.
//!
//! A borrowing is either `Active` or `Returned`; the transition happens at
//! most once and is the only moment the fine is computed. The transition
//! itself is a pure function (`Borrowing::close`) so the rules can be
//! exercised without a database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::book::Book;
use super::borrower::Borrower;

/// Borrowing model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Borrowing {
    pub id: i32,
    pub book_id: i32,
    pub borrower_id: i32,
    pub date_borrowed: DateTime<Utc>,
    pub date_due: DateTime<Utc>,
    pub date_returned: Option<DateTime<Utc>>,
    pub fine_amount: Decimal,
}

/// Lifecycle state of a borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowingState {
    Active,
    Returned,
}

/// Result of closing an active borrowing
#[derive(Debug, Clone, Copy)]
pub struct ReturnOutcome {
    pub date_returned: DateTime<Utc>,
    pub fine_amount: Decimal,
}

impl Borrowing {
    pub fn state(&self) -> BorrowingState {
        if self.date_returned.is_some() {
            BorrowingState::Returned
        } else {
            BorrowingState::Active
        }
    }

    /// Explicit `Active` → `Returned` transition.
    ///
    /// Computes the fine exactly once: whole calendar days past the due
    /// date, times `fee_per_day`. Time of day is ignored, so a return at
    /// 23:59 on the due date costs nothing and a return at 00:01 the next
    /// day costs one day.
    pub fn close(
        &self,
        date_returned: DateTime<Utc>,
        fee_per_day: Decimal,
    ) -> AppResult<ReturnOutcome> {
        if self.state() == BorrowingState::Returned {
            return Err(AppError::Validation(
                "This book has already been returned.".to_string(),
            ));
        }

        Ok(ReturnOutcome {
            date_returned,
            fine_amount: late_fee(self.date_due, date_returned, fee_per_day),
        })
    }
}

/// Fine for a return: whole calendar days late times the per-day fee, zero
/// for on-time or early returns.
pub fn late_fee(
    date_due: DateTime<Utc>,
    date_returned: DateTime<Utc>,
    fee_per_day: Decimal,
) -> Decimal {
    let days_late = (date_returned.date_naive() - date_due.date_naive()).num_days();
    if days_late > 0 {
        Decimal::from(days_late) * fee_per_day
    } else {
        Decimal::ZERO
    }
}

/// Borrowing with nested book and borrower for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowingDetails {
    pub id: i32,
    pub book: Book,
    pub borrower: Borrower,
    pub date_borrowed: DateTime<Utc>,
    pub date_due: DateTime<Utc>,
    pub date_returned: Option<DateTime<Utc>>,
    pub fine_amount: Decimal,
}

/// Create borrowing request. Either `borrower_id` or `borrower_name` (with
/// optional contact details, used only when a new borrower is created)
/// identifies the borrower.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBorrowing {
    pub book_id: i32,
    pub borrower_id: Option<i32>,
    pub borrower_name: Option<String>,
    pub borrower_contact: Option<String>,
    pub borrower_email: Option<String>,
    pub borrower_address: Option<String>,
}

/// Update borrowing request. Setting `date_returned` is the only allowed
/// update (the Return action); unknown fields are rejected at
/// deserialization.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReturnBorrowing {
    pub date_returned: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fee() -> Decimal {
        Decimal::new(30, 0)
    }

    fn borrowing(date_due: DateTime<Utc>, date_returned: Option<DateTime<Utc>>) -> Borrowing {
        Borrowing {
            id: 1,
            book_id: 1,
            borrower_id: 1,
            date_borrowed: date_due - Duration::days(7),
            date_due,
            date_returned,
            fine_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn on_time_return_has_no_fine() {
        let due = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let b = borrowing(due, None);

        let outcome = b.close(due - Duration::hours(2), fee()).unwrap();
        assert_eq!(outcome.fine_amount, Decimal::ZERO);
    }

    #[test]
    fn same_day_late_return_has_no_fine() {
        // Past the due timestamp but still the same calendar day
        let due = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();

        let outcome = borrowing(due, None).close(returned, fee()).unwrap();
        assert_eq!(outcome.fine_amount, Decimal::ZERO);
    }

    #[test]
    fn fine_is_thirty_per_whole_day_late() {
        let due = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2024, 3, 13, 0, 30, 0).unwrap();

        let outcome = borrowing(due, None).close(returned, fee()).unwrap();
        assert_eq!(outcome.fine_amount, Decimal::new(90, 0));
    }

    #[test]
    fn fractional_day_rounds_down_to_calendar_days() {
        // 1 day and 20 hours past due, but only one calendar day boundary crossed
        let due = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2024, 3, 11, 22, 0, 0).unwrap();

        let outcome = borrowing(due, None).close(returned, fee()).unwrap();
        assert_eq!(outcome.fine_amount, Decimal::new(30, 0));
    }

    #[test]
    fn closing_a_returned_borrowing_is_rejected() {
        let due = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let b = borrowing(due, Some(due));

        assert_eq!(b.state(), BorrowingState::Returned);
        assert!(b.close(due + Duration::days(1), fee()).is_err());
    }
}
