//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, UserDetails, UserPageQuery, UserSummary},
};

use super::books::PaginatedResponse;

/// List users sorted and paginated
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(
        ("page" = Option<i64>, Query, description = "Page number, zero-based (default: 0)"),
        ("size" = Option<i64>, Query, description = "Items per page (default: 1)"),
        ("sortBy" = Option<String>, Query, description = "Sort field: id, username or email (default: id)"),
        ("order" = Option<String>, Query, description = "Sort order: asc or desc (default: asc)")
    ),
    responses(
        (status = 200, description = "Page of users", body = PaginatedResponse<UserSummary>),
        (status = 400, description = "Invalid page parameters")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    Query(query): Query<UserPageQuery>,
) -> AppResult<Json<PaginatedResponse<UserSummary>>> {
    let (users, total) = state.services.users.get_sorted_page(&query).await?;

    Ok(Json(PaginatedResponse {
        items: users,
        total,
        page: query.page,
        size: query.size,
    }))
}

/// Get user details by ID, including currently held books
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDetails),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserDetails>> {
    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserDetails),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserDetails>)> {
    let created = state.services.users.create(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing user. Omitted fields keep their current values.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserDetails),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already used by another user")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Json<UserDetails>> {
    let updated = state.services.users.update(id, update).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User has issued books")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
