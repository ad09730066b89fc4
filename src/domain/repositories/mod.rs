//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so services can be exercised against
//! `mockall` mocks. Implementations live in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Shortening CRUD plus the redirect counter
//! - [`UserRepository`] - Accounts and token-based user lookup
//! - [`TokenRepository`] - Activation and authentication tokens
//! - [`PermissionRepository`] - Permission codes granted to users
//!
//! # Testing
//!
//! PostgreSQL behaviour is covered by `tests/repository_*.rs`.

pub mod link_repository;
pub mod permission_repository;
pub mod token_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use permission_repository::PermissionRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
