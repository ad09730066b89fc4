//! Repository trait for shortening data access.

use crate::domain::entities::{Link, LinkFilter, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for shortened links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `version = 1` and `visits = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::IdentifierCollision`] if the identifier is taken.
    /// Returns [`AppError::Transient`] on timeouts or connectivity faults.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Fetches a link by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such link exists.
    async fn get(&self, identifier: &str) -> Result<Link, AppError>;

    /// Writes `link.original_url` conditioned on `link.version` still being
    /// current, bumping the version by one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EditConflict`] when no row matched. A concurrent
    /// delete is reported the same way; callers re-read to tell them apart.
    async fn update(&self, link: &Link) -> Result<Link, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row was deleted.
    async fn delete(&self, identifier: &str) -> Result<(), AppError>;

    /// Returns the original URL and increments `visits` by exactly one, as one
    /// atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the identifier does not exist. Nothing
    /// is counted in that case.
    async fn resolve_and_count(&self, identifier: &str) -> Result<String, AppError>;

    /// Lists one page of links and the total number of matching rows.
    async fn list(&self, filter: &LinkFilter) -> Result<(Vec<Link>, i64), AppError>;

    /// All links owned by a user, newest first.
    async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError>;
}
