use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::models::UserView;
use crate::response::ApiResponse;
use crate::users::repository::{ProfileInput, UserRepository, UserUpdate};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub profile: Option<ProfileInput>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub profile: Option<ProfileInput>,
}

/// Create a new user
///
/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserView>),
        (status = 409, description = "User with this email already exists"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if UserRepository::get_by_email(state.db.pool(), &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&req.password)?;
    let user = UserRepository::create(
        state.db.pool(),
        &req.name,
        &req.email,
        &password_hash,
        req.profile.as_ref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("User created successfully", user)),
    ))
}

/// Get all users
///
/// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users fetched successfully", body = ApiResponse<Vec<UserView>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_all_users(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<UserView>>>), ApiError> {
    let users = UserRepository::list(state.db.pool()).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Users fetched successfully", users)),
    ))
}

/// Get user by ID
///
/// GET /api/v1/users/{user_id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User fetched successfully", body = ApiResponse<UserView>),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let user = UserRepository::get_view(state.db.pool(), user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User fetched successfully", user)),
    ))
}

/// Update user
///
/// PUT /api/v1/users/{user_id}
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserView>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let existing = UserRepository::get_by_id(state.db.pool(), user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(ref email) = req.email {
        if *email != existing.email
            && UserRepository::get_by_email(state.db.pool(), email)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }
    }

    let password = match req.password {
        Some(ref p) => Some(state.auth.hash_password(p)?),
        None => None,
    };

    let user = UserRepository::update(
        state.db.pool(),
        user_id,
        UserUpdate {
            name: req.name,
            email: req.email,
            password,
            profile: req.profile,
        },
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("User updated successfully", user)),
    ))
}

/// Delete user (and its profile)
///
/// DELETE /api/v1/users/{user_id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    UserRepository::get_by_id(state.db.pool(), user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    UserRepository::delete(state.db.pool(), user_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message(
            StatusCode::OK,
            "User deleted successfully",
        )),
    ))
}
