//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, TokenScope, User};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a non-activated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the e-mail is already registered.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Persists `name`, `email`, credential and `activated` when `user.version`
    /// is still current. Returns the user with its new version.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EditConflict`] when the version moved on and
    /// [`AppError::Conflict`] on a duplicate e-mail.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Looks up the owner of a token by its hash, restricted to `scope` and to
    /// tokens whose expiry is after `now`.
    async fn get_for_token(
        &self,
        scope: TokenScope,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError>;
}
