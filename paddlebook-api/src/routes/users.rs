/// Member account endpoints
///
/// This module provides CRUD endpoints for member accounts.
/// All endpoints require JWT authentication.
///
/// # Endpoints
///
/// - `GET /v1/users` - List members
/// - `GET /v1/users/:id` - Get a member
/// - `PUT /v1/users/:id` - Update a member (self or admin)
/// - `DELETE /v1/users/:id` - Delete a member (self or admin)
///
/// Password hashes never appear in responses; handlers map the stored
/// account onto [`UserResponse`].

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::{double_option, validation_error},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use paddlebook_core::{
    auth::{
        authorization::{authorize, Action},
        middleware::Actor,
        password,
    },
    models::user::{UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Member account as returned by the API (no password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Admin flag
    pub is_admin: bool,

    /// Club membership number
    pub membership_no: Option<i32>,

    /// Created at
    pub created_at: chrono::DateTime<chrono::Utc>,

    /// Updated at
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            membership_no: user.membership_no,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// List users query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Maximum number of results (default 50)
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Offset into the result set (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Update user request
///
/// `membership_no` distinguishes absent (keep) from null (clear).
/// `is_admin` is ignored unless the caller is an admin.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// New membership number (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub membership_no: Option<Option<i32>>,

    /// Grant or revoke the admin flag (admin callers only)
    pub is_admin: Option<bool>,
}

/// List member accounts
///
/// # Endpoint
///
/// ```text
/// GET /v1/users?limit=50&offset=0
/// Authorization: Bearer <jwt_token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `500 Internal Server Error`: Server error
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    authorize(&actor, Action::ReadUsers)?;

    let limit = query.limit.clamp(1, 200);
    let offset = query.offset.max(0);

    let users = User::list(&state.db, limit, offset).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a member account by ID
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    authorize(&actor, Action::ReadUsers)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update a member account
///
/// Members may update their own account; admins may update anyone.
/// Only admins may change the `is_admin` flag, on any account.
///
/// # Endpoint
///
/// ```text
/// PUT /v1/users/:id
/// Authorization: Bearer <jwt_token>
/// Content-Type: application/json
///
/// {
///   "email": "new@example.com",
///   "membership_no": null
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Not the account owner and not an admin
/// - `404 Not Found`: No such user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let member = authorize(&actor, Action::MutateUser { target_id: id })?;

    req.validate().map_err(validation_error)?;

    let password_hash = match &req.password {
        Some(p) => {
            password::validate_password_strength(p).map_err(|e| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "password".to_string(),
                    message: e,
                }])
            })?;
            Some(password::hash_password(p)?)
        }
        None => None,
    };

    // Non-admins cannot touch the admin flag, their own included
    let is_admin = if member.is_admin { req.is_admin } else { None };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            email: req.email,
            password_hash,
            membership_no: req.membership_no,
            is_admin,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a member account
///
/// Members may delete their own account; admins may delete anyone.
/// The member's bookings are removed with the account.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid JWT token
/// - `403 Forbidden`: Not the account owner and not an admin
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    authorize(&actor, Action::MutateUser { target_id: id })?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
