//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{AuthService, LinkService, UserService};
use crate::infrastructure::ClientRateLimiter;

/// Application state shared across all request handlers.
///
/// Cloned per request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub rate_limiter: Arc<ClientRateLimiter>,
    /// Pool used by the health check. `None` when running without a database.
    pub pool: Option<PgPool>,
    pub environment: String,
    /// Take the rate-limit key from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}
