//! Default activation notifier.

use async_trait::async_trait;
use tracing::info;

use crate::domain::entities::User;
use crate::domain::notifier::ActivationNotifier;

/// Records that an activation token was issued. The token itself is not
/// logged; operators activate accounts with the admin CLI or wire a real
/// delivery channel in its place.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ActivationNotifier for LogNotifier {
    async fn send_activation(&self, user: &User, _token_plaintext: &str) -> anyhow::Result<()> {
        info!(user_id = user.id, "Activation token issued");
        Ok(())
    }
}
