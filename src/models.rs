//! Row types and API views for users, profiles, accounts and transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// User row, including the password hash. Never serialized directly;
/// handlers expose [`UserView`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Identity profile, one-to-one with a user
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    #[schema(example = "KTP")]
    pub identity_type: String,
    #[schema(example = "3174052509900001")]
    pub identity_number: String,
    pub address: String,
}

/// User as exposed over the API (no password hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub name: String,
    #[schema(example = "budi.santoso@email.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub profile: Option<Profile>,
}

impl UserView {
    pub fn from_parts(user: User, profile: Option<Profile>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            profile,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: i64,
    pub user_id: i64,
    #[schema(example = "Bank Mandiri")]
    pub bank_name: String,
    #[schema(example = "1234567890")]
    pub bank_account_number: String,
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Account with its owning user, for the detail endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    #[serde(flatten)]
    pub account: BankAccount,
    pub user: UserView,
}

/// Completed transfer between two accounts
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub source_account_id: i64,
    pub destination_account_id: i64,
    #[schema(value_type = String, example = "250.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Transaction with both endpoint accounts resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub source_account: AccountDetail,
    pub destination_account: AccountDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view_hides_password() {
        let user = User {
            id: 1,
            name: "Budi Santoso".to_string(),
            email: "budi.santoso@email.com".to_string(),
            password: "$argon2id$v=19$...".to_string(),
            created_at: Utc::now(),
        };
        let view = UserView::from_parts(user, None);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "budi.santoso@email.com");
        assert_eq!(json["profile"], serde_json::Value::Null);
    }

    #[test]
    fn test_account_detail_flattens_account_fields() {
        let account = BankAccount {
            id: 7,
            user_id: 1,
            bank_name: "Bank Mandiri".to_string(),
            bank_account_number: "1234567890".to_string(),
            balance: Decimal::new(100_000, 2),
            created_at: Utc::now(),
        };
        let user = UserView {
            id: 1,
            name: "Budi".to_string(),
            email: "budi@email.com".to_string(),
            created_at: Utc::now(),
            profile: None,
        };
        let json = serde_json::to_value(&AccountDetail { account, user }).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["bankAccountNumber"], "1234567890");
        assert_eq!(json["balance"], "1000.00");
        assert_eq!(json["user"]["id"], 1);
    }
}
