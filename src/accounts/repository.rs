//! Repository layer for bank account rows.
//!
//! Deposit and withdraw are single atomic `UPDATE ... RETURNING` statements;
//! the withdraw guard (`balance >= amount`) lives in the WHERE clause so a
//! concurrent withdrawal can never drive the balance negative.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::models::{AccountDetail, BankAccount};
use crate::users::repository::UserRepository;

const ACCOUNT_COLUMNS: &str = "id, user_id, bank_name, bank_account_number, balance, created_at";

pub struct AccountRepository;

impl AccountRepository {
    pub async fn get_by_id(pool: &PgPool, account_id: i64) -> Result<Option<BankAccount>, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts WHERE id = $1"
        ))
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
        Ok(account)
    }

    pub async fn get_by_number(
        pool: &PgPool,
        bank_account_number: &str,
    ) -> Result<Option<BankAccount>, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts WHERE bank_account_number = $1"
        ))
        .bind(bank_account_number)
        .fetch_optional(pool)
        .await?;
        Ok(account)
    }

    /// Account plus its owning user, for the detail endpoint
    pub async fn get_detail(pool: &PgPool, account_id: i64) -> Result<Option<AccountDetail>, ApiError> {
        let Some(account) = Self::get_by_id(pool, account_id).await? else {
            return Ok(None);
        };
        let user = UserRepository::get_view(pool, account.user_id)
            .await?
            .ok_or_else(|| ApiError::Internal("Account owner missing".to_string()))?;
        Ok(Some(AccountDetail { account, user }))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<BankAccount>, ApiError> {
        let accounts = sqlx::query_as::<_, BankAccount>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts ORDER BY id"
        ))
        .fetch_all(pool)
        .await?;
        Ok(accounts)
    }

    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        bank_name: &str,
        bank_account_number: &str,
        balance: Decimal,
    ) -> Result<BankAccount, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "INSERT INTO bank_accounts (user_id, bank_name, bank_account_number, balance)
             VALUES ($1, $2, $3, $4)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(bank_name)
        .bind(bank_account_number)
        .bind(balance)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            ApiError::from_db(e, "An account with this bank account number already exists")
        })?;
        Ok(account)
    }

    /// Partial update; absent fields keep their current values
    pub async fn update(
        pool: &PgPool,
        account_id: i64,
        bank_name: Option<&str>,
        bank_account_number: Option<&str>,
    ) -> Result<BankAccount, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "UPDATE bank_accounts
             SET bank_name = COALESCE($2, bank_name),
                 bank_account_number = COALESCE($3, bank_account_number)
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account_id)
        .bind(bank_name)
        .bind(bank_account_number)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            ApiError::from_db(e, "An account with this bank account number already exists")
        })?;
        Ok(account)
    }

    pub async fn delete(pool: &PgPool, account_id: i64) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM bank_accounts WHERE id = $1")
            .bind(account_id)
            .execute(pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    ApiError::Validation(
                        "Account has recorded transactions and cannot be deleted".to_string(),
                    )
                }
                _ => ApiError::Database(e),
            })?;
        Ok(())
    }

    /// Credit the account; caller has already verified existence
    pub async fn deposit(
        pool: &PgPool,
        account_id: i64,
        amount: Decimal,
    ) -> Result<Option<BankAccount>, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "UPDATE bank_accounts SET balance = balance + $2
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account_id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;
        Ok(account)
    }

    /// Debit the account; returns `None` when the balance guard fails
    pub async fn withdraw(
        pool: &PgPool,
        account_id: i64,
        amount: Decimal,
    ) -> Result<Option<BankAccount>, ApiError> {
        let account = sqlx::query_as::<_, BankAccount>(&format!(
            "UPDATE bank_accounts SET balance = balance - $2
             WHERE id = $1 AND balance >= $2
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account_id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;
        Ok(account)
    }
}
