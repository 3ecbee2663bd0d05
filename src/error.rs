//! API error types and their HTTP mapping.
//!
//! Every handler error converges here and is rendered as the standard
//! `{statusCode, message}` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing user / account / transaction
    #[error("{0}")]
    NotFound(String),
    /// Duplicate email or bank account number
    #[error("{0}")]
    Conflict(String),
    /// Non-positive amount, malformed input, constraint breach
    #[error("{0}")]
    Validation(String),
    /// Source balance below the requested amount
    #[error("{0}")]
    InsufficientFunds(String),
    /// Missing, invalid or expired token
    #[error("{0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) | Self::InsufficientFunds(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a database error raised by an insert/update: unique-key
    /// violations become Conflict, check violations (negative balance)
    /// become Validation, everything else stays a 500.
    pub fn from_db(err: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict_msg.to_string());
            }
            if db_err.is_check_violation() {
                return Self::Validation("Operation would leave a negative balance".to_string());
            }
        }
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:?}", self);
        }
        let body = ApiResponse::message(status, self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound("User not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("Email already in use".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation("Amount must be a positive number".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InsufficientFunds("Insufficient funds".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("Invalid token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passthrough() {
        let err = ApiError::NotFound("Source account not found".into());
        assert_eq!(err.to_string(), "Source account not found");
    }
}
