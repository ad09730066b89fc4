//! Argon2id password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde_json::json;

use crate::domain::credentials::CredentialVerifier;
use crate::error::AppError;

/// [`CredentialVerifier`] backed by Argon2id with default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgonCredentialVerifier;

impl CredentialVerifier for ArgonCredentialVerifier {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal("Password hashing failed", json!({ "reason": e.to_string() })))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            AppError::internal("Stored password hash is unreadable", json!({ "reason": e.to_string() }))
        })?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(
                "Password verification failed",
                json!({ "reason": e.to_string() }),
            )),
        }
    }
}
