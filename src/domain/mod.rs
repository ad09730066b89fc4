//! Domain layer containing business entities and contracts.
//!
//! Nothing in here knows about HTTP or PostgreSQL. Infrastructure implements the
//! traits declared here and the application layer composes them.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`clock`] - Injectable wall clock for expiry checks
//! - [`credentials`] - Opaque password hashing capability
//! - [`notifier`] - Out-of-band delivery of activation tokens

pub mod clock;
pub mod credentials;
pub mod entities;
pub mod notifier;
pub mod repositories;
