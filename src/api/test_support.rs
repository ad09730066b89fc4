//! Mock-backed [`AppState`] for HTTP tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::application::services::{AuthService, LinkService, UserService};
use crate::domain::clock::FixedClock;
use crate::domain::credentials::MockCredentialVerifier;
use crate::domain::entities::{Credential, Link, User};
use crate::domain::notifier::MockActivationNotifier;
use crate::domain::repositories::{
    MockLinkRepository, MockPermissionRepository, MockTokenRepository, MockUserRepository,
};
use crate::infrastructure::{ClientRateLimiter, RateLimiterConfig};
use crate::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
}

pub fn test_user(activated: bool) -> User {
    User {
        id: 7,
        created_at: now(),
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        credential: Credential::new("stored-hash"),
        activated,
        version: 1,
    }
}

pub fn test_link(identifier: &str, version: i32) -> Link {
    Link::new(
        identifier.to_string(),
        "https://example.com/".to_string(),
        Some(7),
        0,
        version,
        now(),
    )
}

/// Mocks to set expectations on before building the state.
pub struct TestState {
    pub links: MockLinkRepository,
    pub users: MockUserRepository,
    pub tokens: MockTokenRepository,
    pub permissions: MockPermissionRepository,
    pub verifier: MockCredentialVerifier,
    pub notifier: MockActivationNotifier,
    pub limiter: RateLimiterConfig,
}

impl TestState {
    pub fn new() -> Self {
        Self {
            links: MockLinkRepository::new(),
            users: MockUserRepository::new(),
            tokens: MockTokenRepository::new(),
            permissions: MockPermissionRepository::new(),
            verifier: MockCredentialVerifier::new(),
            notifier: MockActivationNotifier::new(),
            limiter: RateLimiterConfig {
                enabled: false,
                ..RateLimiterConfig::default()
            },
        }
    }

    pub fn into_state(self) -> AppState {
        let clock = Arc::new(FixedClock(now()));
        let users = Arc::new(self.users);
        let permissions = Arc::new(self.permissions);

        AppState {
            link_service: Arc::new(LinkService::new(Arc::new(self.links), BASE_URL)),
            auth_service: Arc::new(AuthService::new(
                users.clone(),
                permissions.clone(),
                clock.clone(),
            )),
            user_service: Arc::new(UserService::new(
                users,
                Arc::new(self.tokens),
                permissions,
                Arc::new(self.verifier),
                Arc::new(self.notifier),
                clock,
            )),
            rate_limiter: Arc::new(ClientRateLimiter::new(self.limiter)),
            pool: None,
            environment: "test".to_string(),
            behind_proxy: false,
        }
    }
}
