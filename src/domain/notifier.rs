//! Delivery of activation tokens to newly registered users.

use async_trait::async_trait;

use crate::domain::entities::User;

/// Hands a freshly issued activation token to whatever channel reaches the user
/// (e-mail, chat, an operator console).
///
/// Delivery happens after the registration response has been decided; a failed
/// delivery is logged by the caller and never fails the registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivationNotifier: Send + Sync {
    async fn send_activation(&self, user: &User, token_plaintext: &str) -> anyhow::Result<()>;
}
