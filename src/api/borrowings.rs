//! Borrowing (loan transaction) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::borrowing::{BorrowingDetails, CreateBorrowing, ReturnBorrowing},
};

use super::{AppJson, AuthenticatedUser};

/// List all borrowings, newest first
#[utoipa::path(
    get,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of borrowings", body = Vec<BorrowingDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrowings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowingDetails>>> {
    let borrowings = state.services.lending.list_borrowings().await?;
    Ok(Json(borrowings))
}

/// Get borrowing details by ID
#[utoipa::path(
    get,
    path = "/borrowings/{id}",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 200, description = "Borrowing details", body = BorrowingDetails),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn get_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowingDetails>> {
    let borrowing = state.services.lending.get_borrowing(id).await?;
    Ok(Json(borrowing))
}

/// Create a borrowing (loan a book)
#[utoipa::path(
    post,
    path = "/borrowings",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowing,
    responses(
        (status = 201, description = "Borrowing created", body = BorrowingDetails),
        (status = 400, description = "No copies available, book not found, or missing borrower identification")
    )
)]
pub async fn create_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    AppJson(request): AppJson<CreateBorrowing>,
) -> AppResult<(StatusCode, Json<BorrowingDetails>)> {
    // Availability is checked here before construction and again inside the
    // write path, which does the actual conditional decrement.
    let book = state
        .services
        .catalog
        .get_book(request.book_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::field("book_id", "Book not found."),
            other => other,
        })?;

    if book.available_copies <= 0 {
        return Err(AppError::Validation(
            "No copies available for borrowing.".to_string(),
        ));
    }

    let created = state.services.lending.create_borrowing(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Return a borrowed book. Setting `date_returned` is the only allowed
/// update; PUT and PATCH behave identically.
#[utoipa::path(
    put,
    path = "/borrowings/{id}",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    request_body = ReturnBorrowing,
    responses(
        (status = 200, description = "Borrowing returned", body = BorrowingDetails),
        (status = 400, description = "Already returned or disallowed field in update"),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn update_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    AppJson(request): AppJson<ReturnBorrowing>,
) -> AppResult<Json<BorrowingDetails>> {
    let returned = state.services.lending.return_borrowing(id, request).await?;
    Ok(Json(returned))
}

/// Delete a borrowing
#[utoipa::path(
    delete,
    path = "/borrowings/{id}",
    tag = "borrowings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrowing ID")
    ),
    responses(
        (status = 204, description = "Borrowing deleted"),
        (status = 404, description = "Borrowing not found")
    )
)]
pub async fn delete_borrowing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.lending.delete_borrowing(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
