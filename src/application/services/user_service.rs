//! Registration, activation and token issuing for user accounts.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::domain::clock::Clock;
use crate::domain::credentials::CredentialVerifier;
use crate::domain::entities::{
    AuthToken, Credential, NewUser, SHORTENINGS_READ, SHORTENINGS_WRITE, TokenScope, User,
};
use crate::domain::notifier::ActivationNotifier;
use crate::domain::repositories::{PermissionRepository, TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::token::{hash_plaintext, validate_plaintext};

/// Input for [`UserService::register`].
#[derive(Debug, Clone, Validate)]
pub struct Registration {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("must be provided")));
    }
    if name.len() > 500 {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("must not be more than 500 bytes long")));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("must be at least 8 bytes long")));
    }
    if password.len() > 72 {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("must not be more than 72 bytes long")));
    }
    Ok(())
}

/// Account lifecycle service.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    permissions: Arc<dyn PermissionRepository>,
    verifier: Arc<dyn CredentialVerifier>,
    notifier: Arc<dyn ActivationNotifier>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        permissions: Arc<dyn PermissionRepository>,
        verifier: Arc<dyn CredentialVerifier>,
        notifier: Arc<dyn ActivationNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            permissions,
            verifier,
            notifier,
            clock,
        }
    }

    /// Registers a non-activated user with read and write permissions and
    /// sends an activation token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad input and [`AppError::Conflict`]
    /// for an e-mail that is already registered.
    pub async fn register(&self, input: Registration) -> Result<User, AppError> {
        input.validate()?;

        let credential = self.hash_password(input.password).await?;

        let user = self
            .users
            .insert(NewUser {
                name: input.name,
                email: input.email,
                credential,
            })
            .await?;

        self.permissions
            .add_for_user(
                user.id,
                vec![SHORTENINGS_READ.to_string(), SHORTENINGS_WRITE.to_string()],
            )
            .await?;

        let token = self
            .issue_token(user.id, TokenScope::Activation, TokenScope::Activation.default_ttl())
            .await?;

        if let Err(e) = self.notifier.send_activation(&user, &token.plaintext).await {
            error!(user_id = user.id, error = %e, "Failed to deliver activation token");
        }

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Exchanges an activation token for an activated account and revokes all
    /// of the user's activation tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed, unknown or expired
    /// token and [`AppError::EditConflict`] if the account changed meanwhile.
    pub async fn activate(&self, token_plaintext: &str) -> Result<User, AppError> {
        let invalid = || {
            AppError::validation(
                "invalid or expired activation token",
                json!({ "field": "token" }),
            )
        };

        validate_plaintext(token_plaintext).map_err(|_| invalid())?;

        let mut user = self
            .users
            .get_for_token(
                TokenScope::Activation,
                &hash_plaintext(token_plaintext),
                self.clock.now(),
            )
            .await?
            .ok_or_else(invalid)?;

        user.activated = true;
        let user = self.users.update(&user).await?;

        self.tokens
            .delete_all_for_user(TokenScope::Activation, user.id)
            .await?;

        info!(user_id = user.id, "User activated");
        Ok(user)
    }

    /// Activates an account directly, bypassing the token exchange.
    pub async fn activate_by_email(&self, email: &str) -> Result<User, AppError> {
        let mut user = self.find_by_email(email).await?;
        if user.activated {
            return Ok(user);
        }

        user.activated = true;
        let user = self.users.update(&user).await?;
        self.tokens
            .delete_all_for_user(TokenScope::Activation, user.id)
            .await?;

        Ok(user)
    }

    /// Checks e-mail and password and issues an authentication token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCredentials`] for an unknown e-mail or a
    /// wrong password, without saying which.
    pub async fn issue_authentication_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, AppError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        let verifier = self.verifier.clone();
        let plaintext = password.to_string();
        let hash = user.credential.as_str().to_string();
        let matches = tokio::task::spawn_blocking(move || verifier.verify(&plaintext, &hash))
            .await
            .map_err(|e| {
                AppError::internal("Credential check failed", json!({ "reason": e.to_string() }))
            })??;

        if !matches {
            return Err(AppError::invalid_credentials());
        }

        self.issue_token(
            user.id,
            TokenScope::Authentication,
            TokenScope::Authentication.default_ttl(),
        )
        .await
    }

    /// Mints, stores and returns a token. The plaintext is only available on
    /// the returned value.
    pub async fn issue_token(
        &self,
        user_id: i64,
        scope: TokenScope,
        ttl: Duration,
    ) -> Result<AuthToken, AppError> {
        let token = AuthToken::generate(user_id, ttl, scope, self.clock.now())?;
        self.tokens.insert(&token).await?;
        Ok(token)
    }

    /// Grants permission codes to the user with this e-mail.
    pub async fn grant_permissions(&self, email: &str, codes: Vec<String>) -> Result<(), AppError> {
        let user = self.find_by_email(email).await?;
        self.permissions.add_for_user(user.id, codes).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no user has this e-mail.
    pub async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "email": email })))
    }

    async fn hash_password(&self, password: String) -> Result<Credential, AppError> {
        let verifier = self.verifier.clone();
        let hash = tokio::task::spawn_blocking(move || verifier.hash(&password))
            .await
            .map_err(|e| {
                AppError::internal("Password hashing failed", json!({ "reason": e.to_string() }))
            })??;

        Ok(Credential::new(hash))
    }
}
