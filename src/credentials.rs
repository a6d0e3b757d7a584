//! Password hashing and verification for the authentication layer
//!
//! The repository only stores and returns the opaque PHC string produced
//! here; comparing a plaintext against it happens in this module.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::account::AccountStorage;
use crate::error::{LedgerError, LedgerResult};

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LedgerError::Internal(format!("Hashing failed: {}", e)))
}

/// Check `password` against a stored hash
pub fn verify_password(password_hash: &str, password: &str) -> LedgerResult<()> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| LedgerError::Internal(format!("Invalid hash format: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| LedgerError::Unauthorized)
}

/// Verify a login attempt against the stored credential.
///
/// An unknown username is reported as `Unauthorized`, same as a wrong
/// password.
pub async fn verify_login(
    store: &dyn AccountStorage,
    username: &str,
    password: &str,
) -> LedgerResult<()> {
    let password_hash = match store.password_hash_by_username(username).await {
        Ok(hash) => hash,
        Err(LedgerError::NotFound(_)) => {
            tracing::debug!(username, "Login for unknown username");
            return Err(LedgerError::Unauthorized);
        }
        Err(e) => return Err(e),
    };

    verify_password(&password_hash, password).inspect_err(|_| {
        tracing::debug!(username, "Login with wrong password");
    })
}
