//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Responses wrap their payload in a named envelope
//! (`{"shortening": {...}}`, `{"user": {...}}`).

pub mod health;
pub mod shortening;
pub mod token;
pub mod user;
