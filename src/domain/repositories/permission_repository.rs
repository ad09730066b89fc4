//! Repository trait for permission codes.

use crate::domain::entities::Permissions;
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn get_all_for_user(&self, user_id: i64) -> Result<Permissions, AppError>;

    /// Grants the given codes. Codes already held are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a code is not a known permission.
    async fn add_for_user(&self, user_id: i64, codes: Vec<String>) -> Result<(), AppError>;
}
