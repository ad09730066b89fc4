//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rate_limiter`] - In-process per-client token buckets
//! - [`credentials`] - Argon2id password hashing
//! - [`notifier`] - Activation token delivery

pub mod credentials;
pub mod notifier;
pub mod persistence;
pub mod rate_limiter;

pub use credentials::ArgonCredentialVerifier;
pub use notifier::LogNotifier;
pub use rate_limiter::{ClientRateLimiter, RateLimiterConfig, SweeperHandle};
