//! Repository trait for activation and authentication tokens.

use crate::domain::entities::{AuthToken, TokenScope};
use crate::error::AppError;
use async_trait::async_trait;

/// Tokens are persisted by hash only; the plaintext never reaches storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert(&self, token: &AuthToken) -> Result<(), AppError>;

    /// Removes every token of `scope` belonging to the user.
    async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64) -> Result<(), AppError>;
}
