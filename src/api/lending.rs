//! Lending endpoints (issue and return of book copies)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::user::UserDetails};

/// Issue a book to a user
#[utoipa::path(
    post,
    path = "/users/{user_id}/issue/{book_id}",
    tag = "lending",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book issued, updated user view", body = UserDetails),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "No available copies, or book already issued to this user")
    )
)]
pub async fn issue_book(
    State(state): State<crate::AppState>,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> AppResult<Json<UserDetails>> {
    let user = state.services.lending.issue_book(user_id, book_id).await?;
    Ok(Json(user))
}

/// Return a book from a user
#[utoipa::path(
    post,
    path = "/users/{user_id}/return/{book_id}",
    tag = "lending",
    params(
        ("user_id" = i64, Path, description = "User ID"),
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned, updated user view", body = UserDetails),
        (status = 404, description = "User or book not found"),
        (status = 409, description = "Book is not issued to this user")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path((user_id, book_id)): Path<(i64, i64)>,
) -> AppResult<Json<UserDetails>> {
    let user = state.services.lending.return_book(user_id, book_id).await?;
    Ok(Json(user))
}
