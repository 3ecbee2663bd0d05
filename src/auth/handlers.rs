use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::middleware::CurrentUser;
use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::models::UserView;
use crate::response::ApiResponse;
use crate::users::repository::{ProfileInput, UserRepository};

/// User Registration Request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[schema(example = "Budi Santoso")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[schema(example = "budi.santoso@email.com")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[schema(example = "password123")]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub profile: Option<ProfileInput>,
}

/// User Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "budi.santoso@email.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (user + JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserView,
    pub token: String,
}

/// Wrapper for `GET /auth/authenticate`
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user: UserView,
}

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User with this email already exists")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
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

    let token = state.auth.issue_token(user.id)?;
    tracing::info!(user_id = user.id, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "User registered successfully",
            AuthResponse { user, token },
        )),
    ))
}

/// Login user and issue a bearer token
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    // Same message for unknown email and wrong password
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = UserRepository::get_by_email(state.db.pool(), &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !state.auth.verify_password(&req.password, &user.password) {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let token = state.auth.issue_token(user.id)?;
    let profile = UserRepository::get_profile(state.db.pool(), user.id).await?;
    let user = UserView::from_parts(user, profile);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Login successful",
            AuthResponse { user, token },
        )),
    ))
}

/// Verify the bearer token and return the authenticated user
///
/// GET /api/v1/auth/authenticate
#[utoipa::path(
    get,
    path = "/api/v1/auth/authenticate",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<AuthenticatedUser>),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn authenticate(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> (StatusCode, Json<ApiResponse<AuthenticatedUser>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            "Token is valid",
            AuthenticatedUser { user },
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Budi".to_string(),
            email: "budi@email.com".to_string(),
            password: "password123".to_string(),
            profile: None,
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..parse_ok()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".to_string(),
            ..parse_ok()
        };
        assert!(short_password.validate().is_err());
    }

    fn parse_ok() -> RegisterRequest {
        RegisterRequest {
            name: "Budi".to_string(),
            email: "budi@email.com".to_string(),
            password: "password123".to_string(),
            profile: None,
        }
    }

    #[test]
    fn test_register_request_accepts_camel_case_profile() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Siti Rahayu",
            "email": "siti.rahayu@email.com",
            "password": "password456",
            "profile": {
                "identityType": "KTP",
                "identityNumber": "3174052509900002",
                "address": "Jl. Thamrin No. 456, Jakarta Selatan"
            }
        }))
        .unwrap();
        let profile = req.profile.unwrap();
        assert_eq!(profile.identity_type, "KTP");
        assert_eq!(profile.identity_number, "3174052509900002");
    }
}
