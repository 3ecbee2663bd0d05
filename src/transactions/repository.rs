//! Atomic transfer and reversal.
//!
//! Both operations run inside a single database transaction; row locks
//! (`FOR UPDATE`) serialize concurrent transfers touching the same accounts.
//! Any error before commit drops the transaction handle, which rolls back
//! every intermediate write.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::accounts::repository::AccountRepository;
use crate::error::ApiError;
use crate::models::{BankAccount, Transaction, TransactionDetail};

const TRANSACTION_COLUMNS: &str =
    "id, source_account_id, destination_account_id, amount, created_at";

pub struct TransactionRepository;

impl TransactionRepository {
    pub async fn get_by_id(
        pool: &PgPool,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, ApiError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(pool)
        .await?;
        Ok(transaction)
    }

    /// Transaction with both endpoint accounts (and their owners) resolved
    pub async fn get_detail(
        pool: &PgPool,
        transaction_id: i64,
    ) -> Result<Option<TransactionDetail>, ApiError> {
        let Some(transaction) = Self::get_by_id(pool, transaction_id).await? else {
            return Ok(None);
        };

        let source_account = AccountRepository::get_detail(pool, transaction.source_account_id)
            .await?
            .ok_or_else(|| ApiError::Internal("Source account missing".to_string()))?;
        let destination_account =
            AccountRepository::get_detail(pool, transaction.destination_account_id)
                .await?
                .ok_or_else(|| ApiError::Internal("Destination account missing".to_string()))?;

        Ok(Some(TransactionDetail {
            transaction,
            source_account,
            destination_account,
        }))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Transaction>, ApiError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;
        Ok(transactions)
    }

    /// Move `amount` from source to destination and record the transfer.
    ///
    /// All-or-nothing: both balance updates and the ledger insert commit
    /// together or not at all. Self-transfers are permitted; they net to a
    /// zero balance change but still record a Transaction.
    pub async fn transfer(
        pool: &PgPool,
        source_account_id: i64,
        destination_account_id: i64,
        amount: Decimal,
    ) -> Result<Transaction, ApiError> {
        let mut tx = pool.begin().await?;

        // 1. Lock and load the source account
        let source = sqlx::query_as::<_, BankAccount>(
            "SELECT id, user_id, bank_name, bank_account_number, balance, created_at
             FROM bank_accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(source_account_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Source account not found".to_string()))?;

        // 2. Lock and load the destination account
        sqlx::query_as::<_, BankAccount>(
            "SELECT id, user_id, bank_name, bank_account_number, balance, created_at
             FROM bank_accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(destination_account_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Destination account not found".to_string()))?;

        // 3. Funds check against the locked balance
        if source.balance < amount {
            return Err(ApiError::InsufficientFunds(
                "Insufficient funds in source account".to_string(),
            ));
        }

        // 4. Apply both balance deltas and record the transfer
        sqlx::query("UPDATE bank_accounts SET balance = balance - $2 WHERE id = $1")
            .bind(source_account_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE bank_accounts SET balance = balance + $2 WHERE id = $1")
            .bind(destination_account_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions (source_account_id, destination_account_id, amount)
             VALUES ($1, $2, $3)
             RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(source_account_id)
        .bind(destination_account_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            transaction_id = transaction.id,
            source_account_id,
            destination_account_id,
            amount = %amount,
            "Transfer committed"
        );

        Ok(transaction)
    }

    /// Delete a recorded transfer, reversing its balance effect.
    ///
    /// Exact inverse of [`Self::transfer`] under the same atomicity: credit
    /// the source, debit the destination, drop the ledger row. A reversal
    /// that would overdraw the destination trips the balance check
    /// constraint and rolls back.
    pub async fn reverse(pool: &PgPool, transaction_id: i64) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 FOR UPDATE"
        ))
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

        sqlx::query("UPDATE bank_accounts SET balance = balance + $2 WHERE id = $1")
            .bind(transaction.source_account_id)
            .bind(transaction.amount)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE bank_accounts SET balance = balance - $2 WHERE id = $1")
            .bind(transaction.destination_account_id)
            .bind(transaction.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::from_db(e, "Conflicting ledger state"))?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(transaction_id, "Transfer reversed");
        Ok(())
    }
}
