//! Password hashing capability.

use crate::error::AppError;

/// Hashes and verifies user passwords.
///
/// The stored hash is opaque to the rest of the system: nothing outside an
/// implementation of this trait inspects its format.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    /// Derives a storable hash from a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the hashing backend fails.
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch. An error means the hash itself could not
    /// be processed.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AppError>;
}
