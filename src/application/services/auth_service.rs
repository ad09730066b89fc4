//! Bearer token authentication and permission checks.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::entities::{Principal, TokenScope, User};
use crate::domain::repositories::{PermissionRepository, UserRepository};
use crate::error::AppError;
use crate::utils::token::{hash_plaintext, validate_plaintext};

/// Resolves bearer tokens to principals and checks permission codes.
///
/// Tokens are SHA-256 hashed before lookup; the plaintext never reaches
/// storage. Authentication is a read-only lookup.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    permissions: Arc<dyn PermissionRepository>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        permissions: Arc<dyn PermissionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            permissions,
            clock,
        }
    }

    /// Maps an optional bearer token to a principal.
    ///
    /// No token yields [`Principal::Anonymous`].
    ///
    /// # Errors
    ///
    /// - [`AppError::MalformedToken`] if the token is not 26 base32 characters.
    ///   Storage is not consulted.
    /// - [`AppError::InvalidOrExpiredToken`] if no unexpired authentication
    ///   token matches. Unknown and expired tokens are not told apart.
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<Principal, AppError> {
        let Some(token) = bearer else {
            return Ok(Principal::Anonymous);
        };

        validate_plaintext(token)?;

        let hash = hash_plaintext(token);
        let user = self
            .users
            .get_for_token(TokenScope::Authentication, &hash, self.clock.now())
            .await?
            .ok_or_else(AppError::invalid_or_expired_token)?;

        debug!(user_id = user.id, "Authenticated request");
        Ok(Principal::User(user))
    }

    /// Requires a concrete, activated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for anonymous or non-activated principals.
    pub fn require_activated<'a>(&self, principal: &'a Principal) -> Result<&'a User, AppError> {
        let Some(user) = principal.user() else {
            return Err(AppError::forbidden(
                "You must be authenticated to access this resource",
                json!({}),
            ));
        };

        if !user.activated {
            return Err(AppError::forbidden(
                "Your user account must be activated to access this resource",
                json!({}),
            ));
        }

        Ok(user)
    }

    /// Succeeds only if the principal is an activated user holding `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] otherwise; storage failures propagate.
    pub async fn authorize(&self, principal: &Principal, code: &str) -> Result<(), AppError> {
        let user = self.require_activated(principal)?;

        let permissions = self.permissions.get_all_for_user(user.id).await?;
        if !permissions.includes(code) {
            return Err(AppError::forbidden(
                "Your user account doesn't have the necessary permissions to access this resource",
                json!({ "required": code }),
            ));
        }

        Ok(())
    }
}
