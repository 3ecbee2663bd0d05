use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Bearer tokens expire 24 hours after issuance
const TOKEN_TTL_HOURS: i64 = 24;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

/// Password hashing and token signing/verification.
///
/// Holds only the JWT secret; database access stays in the repositories.
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| ApiError::Internal(format!("Hashing failed: {}", e)))
    }

    /// Verify a candidate password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    /// Issue a signed token carrying the user id
    pub fn issue_token(&self, user_id: i64) -> Result<String, ApiError> {
        self.issue_token_with_ttl(user_id, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn issue_token_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String, ApiError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ApiError::Internal("Token expiry out of range".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify signature and expiry; returns the claims on success
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret".to_string())
    }

    #[test]
    fn test_password_hash_and_verify() {
        let svc = service();
        let hash = svc.hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(svc.verify_password("password123", &hash));
        assert!(!svc.verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let svc = service();
        let h1 = svc.hash_password("password123").unwrap();
        let h2 = svc.hash_password("password123").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_token_round_trip() {
        let svc = service();
        let token = svc.issue_token(42).unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        // Issued already past expiry, beyond the default leeway
        let token = svc.issue_token_with_ttl(42, Duration::hours(-2)).unwrap();
        assert!(svc.verify_token(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = AuthService::new("other-secret".to_string())
            .issue_token(42)
            .unwrap();
        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service().verify_token("not.a.token").is_err());
    }
}
