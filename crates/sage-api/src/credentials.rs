//! Password hashing and session tokens.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use sage_types::api::Claims;

/// Longest password accepted, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password too long")]
    PasswordTooLong,
    #[error("password hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Salted Argon2id hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CredentialError::PasswordTooLong);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(CredentialError::Hashing)?;
    Ok(hash.to_string())
}

/// A stored hash that cannot be parsed never verifies.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok()
}

/// Issues and reads HS256 session tokens whose subject is the username.
pub struct CredentialStore {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: chrono::Duration,
}

impl CredentialStore {
    pub fn new(secret: &str) -> Self {
        Self::with_lifetime(secret, chrono::Duration::days(TOKEN_LIFETIME_DAYS))
    }

    pub fn with_lifetime(secret: &str, lifetime: chrono::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn issue_token(&self, username: &str) -> Result<String, CredentialError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.lifetime).timestamp().max(0) as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// The username a valid token was issued for. Bad signatures, malformed
    /// input and expired tokens all yield `None`.
    pub fn read_token(&self, token: &str) -> Option<String> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .ok()
            .map(|data| data.claims.sub)
    }
}
