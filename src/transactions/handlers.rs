use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::models::{Transaction, TransactionDetail};
use crate::response::ApiResponse;
use crate::transactions::repository::TransactionRepository;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub source_account_id: i64,
    pub destination_account_id: i64,
    #[schema(value_type = String, example = "250.00")]
    pub amount: Decimal,
}

/// Transfer funds between two accounts
///
/// POST /api/v1/transactions
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<Transaction>),
        (status = 404, description = "Source or destination account not found"),
        (status = 400, description = "Non-positive amount or insufficient funds"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), ApiError> {
    if req.amount <= Decimal::ZERO {
        return Err(ApiError::Validation(
            "Amount must be a positive number and greater than 0".to_string(),
        ));
    }

    let transaction = TransactionRepository::transfer(
        state.db.pool(),
        req.source_account_id,
        req.destination_account_id,
        req.amount,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Transaction created successfully",
            transaction,
        )),
    ))
}

/// Get all transactions
///
/// GET /api/v1/transactions
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    responses(
        (status = 200, description = "Transactions found", body = ApiResponse<Vec<Transaction>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_all_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Transaction>>>), ApiError> {
    let transactions = TransactionRepository::list(state.db.pool()).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Transactions found", transactions)),
    ))
}

/// Get transaction by ID (with both accounts resolved)
///
/// GET /api/v1/transactions/{transaction_id}
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    params(("transaction_id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction found", body = ApiResponse<TransactionDetail>),
        (status = 404, description = "Transaction not found"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionDetail>>), ApiError> {
    let detail = TransactionRepository::get_detail(state.db.pool(), transaction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Transaction found", detail)),
    ))
}

/// Delete a transaction, reversing its balance effect
///
/// DELETE /api/v1/transactions/{transaction_id}
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    params(("transaction_id" = i64, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction deleted successfully"),
        (status = 404, description = "Transaction not found"),
        (status = 400, description = "Reversal would overdraw the destination account"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(transaction_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    TransactionRepository::reverse(state.db.pool(), transaction_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::message(
            StatusCode::OK,
            "Transaction deleted successfully",
        )),
    ))
}
