use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::accounts::repository::AccountRepository;
use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::models::{AccountDetail, BankAccount};
use crate::response::ApiResponse;
use crate::users::repository::UserRepository;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub user_id: i64,
    #[schema(example = "Bank Mandiri")]
    pub bank_name: String,
    #[schema(example = "1234567890")]
    pub bank_account_number: String,
    /// Initial balance; must be greater than zero
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountRequest {
    #[schema(value_type = String, example = "250.00")]
    pub amount: Decimal,
}

fn ensure_positive(amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Amount must be a positive number and greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Create a bank account
///
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<BankAccount>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Bank account number already in use"),
        (status = 400, description = "Non-positive initial balance"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BankAccount>>), ApiError> {
    UserRepository::get_by_id(state.db.pool(), req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if req.balance <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Balance must be a positive number and greater than 0".to_string(),
        ));
    }

    if AccountRepository::get_by_number(state.db.pool(), &req.bank_account_number)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An account with this bank account number already exists".to_string(),
        ));
    }

    let account = AccountRepository::create(
        state.db.pool(),
        req.user_id,
        &req.bank_name,
        &req.bank_account_number,
        req.balance,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Account created successfully", account)),
    ))
}

/// Get all accounts
///
/// GET /api/v1/accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    responses(
        (status = 200, description = "Accounts fetched successfully", body = ApiResponse<Vec<BankAccount>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_all_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<BankAccount>>>), ApiError> {
    let accounts = AccountRepository::list(state.db.pool()).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Accounts fetched successfully",
            accounts,
        )),
    ))
}

/// Get account by ID (with owning user)
///
/// GET /api/v1/accounts/{account_id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    params(("account_id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account fetched successfully", body = ApiResponse<AccountDetail>),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDetail>>), ApiError> {
    let detail = AccountRepository::get_detail(state.db.pool(), account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Account fetched successfully", detail)),
    ))
}

/// Update account
///
/// PUT /api/v1/accounts/{account_id}
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    params(("account_id" = i64, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<BankAccount>),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Bank account number already in use"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BankAccount>>), ApiError> {
    let existing = AccountRepository::get_by_id(state.db.pool(), account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    if let Some(ref number) = req.bank_account_number {
        if *number != existing.bank_account_number
            && AccountRepository::get_by_number(state.db.pool(), number)
                .await?
                .is_some()
        {
            return Err(ApiError::Conflict(
                "An account with this bank account number already exists".to_string(),
            ));
        }
    }

    let account = AccountRepository::update(
        state.db.pool(),
        account_id,
        req.bank_name.as_deref(),
        req.bank_account_number.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Account updated successfully", account)),
    ))
}

/// Delete account
///
/// DELETE /api/v1/accounts/{account_id}
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    params(("account_id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted successfully"),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    AccountRepository::get_by_id(state.db.pool(), account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    AccountRepository::delete(state.db.pool(), account_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message(
            StatusCode::OK,
            "Account deleted successfully",
        )),
    ))
}

/// Deposit into an account
///
/// POST /api/v1/accounts/{account_id}/deposit
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{account_id}/deposit",
    params(("account_id" = i64, Path, description = "Account ID")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Deposit successfully", body = ApiResponse<BankAccount>),
        (status = 404, description = "Account not found"),
        (status = 400, description = "Non-positive amount"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
    Json(req): Json<AmountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BankAccount>>), ApiError> {
    ensure_positive(req.amount)?;

    let account = AccountRepository::deposit(state.db.pool(), account_id, req.amount)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    tracing::info!(account_id, amount = %req.amount, "Deposit applied");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Deposit successfully", account)),
    ))
}

/// Withdraw from an account
///
/// POST /api/v1/accounts/{account_id}/withdraw
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{account_id}/withdraw",
    params(("account_id" = i64, Path, description = "Account ID")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Withdraw successfully", body = ApiResponse<BankAccount>),
        (status = 404, description = "Account not found"),
        (status = 400, description = "Non-positive amount or insufficient funds"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
    Json(req): Json<AmountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BankAccount>>), ApiError> {
    ensure_positive(req.amount)?;

    AccountRepository::get_by_id(state.db.pool(), account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    // The guard is re-checked atomically inside the UPDATE
    let account = AccountRepository::withdraw(state.db.pool(), account_id, req.amount)
        .await?
        .ok_or_else(|| ApiError::InsufficientFunds("Insufficient funds".to_string()))?;

    tracing::info!(account_id, amount = %req.amount, "Withdrawal applied");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Withdraw successfully", account)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(Decimal::ZERO).is_err());
        assert!(ensure_positive(Decimal::new(-100, 2)).is_err());
        assert!(ensure_positive(Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn test_amount_request_accepts_number_and_string() {
        let from_number: AmountRequest = serde_json::from_str(r#"{"amount": 250.5}"#).unwrap();
        assert_eq!(from_number.amount, Decimal::new(2505, 1));

        let from_string: AmountRequest = serde_json::from_str(r#"{"amount": "250.50"}"#).unwrap();
        assert_eq!(from_string.amount, Decimal::new(25050, 2));
    }

    #[test]
    fn test_amount_request_rejects_non_numeric() {
        assert!(serde_json::from_str::<AmountRequest>(r#"{"amount": "abc"}"#).is_err());
        assert!(serde_json::from_str::<AmountRequest>(r#"{"amount": true}"#).is_err());
    }
}
