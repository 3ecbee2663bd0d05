//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::accounts::handlers::{AmountRequest, CreateAccountRequest, UpdateAccountRequest};
use crate::auth::handlers::{AuthResponse, AuthenticatedUser, LoginRequest, RegisterRequest};
use crate::models::{AccountDetail, BankAccount, Profile, Transaction, TransactionDetail, UserView};
use crate::transactions::handlers::CreateTransactionRequest;
use crate::users::handlers::{CreateUserRequest, UpdateUserRequest};
use crate::users::repository::ProfileInput;

/// Bearer token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /api/v1/auth/register or /api/v1/auth/login; \
                             expires 24 hours after issuance",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Minibank API",
        version = "1.0.0",
        description = "A toy banking REST API: users, bank accounts, deposits/withdrawals, and atomic inter-account transfers.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development")
    ),
    paths(
        // Auth
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::authenticate,
        // Users
        crate::users::handlers::create_user,
        crate::users::handlers::get_all_users,
        crate::users::handlers::get_user,
        crate::users::handlers::update_user,
        crate::users::handlers::delete_user,
        // Accounts
        crate::accounts::handlers::create_account,
        crate::accounts::handlers::get_all_accounts,
        crate::accounts::handlers::get_account,
        crate::accounts::handlers::update_account,
        crate::accounts::handlers::delete_account,
        crate::accounts::handlers::deposit,
        crate::accounts::handlers::withdraw,
        // Transactions
        crate::transactions::handlers::create_transaction,
        crate::transactions::handlers::get_all_transactions,
        crate::transactions::handlers::get_transaction,
        crate::transactions::handlers::delete_transaction,
        // Health
        crate::gateway::health_check,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            AuthenticatedUser,
            CreateUserRequest,
            UpdateUserRequest,
            ProfileInput,
            CreateAccountRequest,
            UpdateAccountRequest,
            AmountRequest,
            CreateTransactionRequest,
            UserView,
            Profile,
            BankAccount,
            AccountDetail,
            Transaction,
            TransactionDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token verification"),
        (name = "Users", description = "User management"),
        (name = "Accounts", description = "Bank account management and balance operations"),
        (name = "Transactions", description = "Inter-account transfers and reversals")
    )
)]
pub struct ApiDoc;
