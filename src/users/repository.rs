//! Repository layer for user and profile rows.

use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{Profile, User, UserView};

/// Profile fields as accepted on create/update
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[schema(example = "KTP")]
    pub identity_type: String,
    #[schema(example = "3174052509900001")]
    pub identity_number: String,
    pub address: String,
}

/// Optional field updates for an existing user; `None` keeps the current value
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Already hashed by the caller
    pub password: Option<String>,
    pub profile: Option<ProfileInput>,
}

pub struct UserRepository;

impl UserRepository {
    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password, created_at FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password, created_at FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn get_profile(pool: &PgPool, user_id: i64) -> Result<Option<Profile>, ApiError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"SELECT id, user_id, identity_type, identity_number, address
               FROM profiles WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(profile)
    }

    /// User with profile, as exposed over the API
    pub async fn get_view(pool: &PgPool, user_id: i64) -> Result<Option<UserView>, ApiError> {
        let Some(user) = Self::get_by_id(pool, user_id).await? else {
            return Ok(None);
        };
        let profile = Self::get_profile(pool, user.id).await?;
        Ok(Some(UserView::from_parts(user, profile)))
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<UserView>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password, created_at FROM users ORDER BY id"#,
        )
        .fetch_all(pool)
        .await?;

        let profiles = sqlx::query_as::<_, Profile>(
            r#"SELECT id, user_id, identity_type, identity_number, address FROM profiles"#,
        )
        .fetch_all(pool)
        .await?;

        let mut by_user: HashMap<i64, Profile> =
            profiles.into_iter().map(|p| (p.user_id, p)).collect();

        Ok(users
            .into_iter()
            .map(|u| {
                let profile = by_user.remove(&u.id);
                UserView::from_parts(u, profile)
            })
            .collect())
    }

    /// Insert a user and (optionally) its profile in one database transaction
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        profile: Option<&ProfileInput>,
    ) -> Result<UserView, ApiError> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password)
               VALUES ($1, $2, $3)
               RETURNING id, name, email, password, created_at"#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ApiError::from_db(e, "User with this email already exists"))?;

        let profile_row = if let Some(p) = profile {
            Some(
                sqlx::query_as::<_, Profile>(
                    r#"INSERT INTO profiles (user_id, identity_type, identity_number, address)
                       VALUES ($1, $2, $3, $4)
                       RETURNING id, user_id, identity_type, identity_number, address"#,
                )
                .bind(user.id)
                .bind(&p.identity_type)
                .bind(&p.identity_number)
                .bind(&p.address)
                .fetch_one(&mut *tx)
                .await?,
            )
        } else {
            None
        };

        tx.commit().await?;
        Ok(UserView::from_parts(user, profile_row))
    }

    /// Apply partial updates; the profile is upserted when supplied
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        update: UserUpdate,
    ) -> Result<UserView, ApiError> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   password = COALESCE($4, password)
               WHERE id = $1
               RETURNING id, name, email, password, created_at"#,
        )
        .bind(user_id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ApiError::from_db(e, "Email already in use"))?;

        let profile_row = if let Some(p) = update.profile {
            Some(
                sqlx::query_as::<_, Profile>(
                    r#"INSERT INTO profiles (user_id, identity_type, identity_number, address)
                       VALUES ($1, $2, $3, $4)
                       ON CONFLICT (user_id) DO UPDATE
                       SET identity_type = EXCLUDED.identity_type,
                           identity_number = EXCLUDED.identity_number,
                           address = EXCLUDED.address
                       RETURNING id, user_id, identity_type, identity_number, address"#,
                )
                .bind(user_id)
                .bind(&p.identity_type)
                .bind(&p.identity_number)
                .bind(&p.address)
                .fetch_one(&mut *tx)
                .await?,
            )
        } else {
            sqlx::query_as::<_, Profile>(
                r#"SELECT id, user_id, identity_type, identity_number, address
                   FROM profiles WHERE user_id = $1"#,
            )
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(UserView::from_parts(user, profile_row))
    }

    /// Delete profile then user as one unit
    pub async fn delete(pool: &PgPool, user_id: i64) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;

        sqlx::query(r#"DELETE FROM profiles WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    ApiError::Validation(
                        "User still owns bank accounts and cannot be deleted".to_string(),
                    )
                }
                _ => ApiError::Database(e),
            })?;

        tx.commit().await?;
        Ok(())
    }
}
