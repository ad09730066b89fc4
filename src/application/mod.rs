//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and business rules behind
//! an API that HTTP handlers and the admin CLI share.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening lifecycle and redirects
//! - [`services::auth_service::AuthService`] - Bearer token authentication and permission checks
//! - [`services::user_service::UserService`] - Registration, activation and login tokens

pub mod services;
