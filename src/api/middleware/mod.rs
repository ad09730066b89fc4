//! HTTP middleware for request processing and protection.
//!
//! Recovery, rate limiting and authentication form the request pipeline
//! (see [`crate::api::pipeline`]); tracing wraps it from the outside.

pub mod auth;
pub mod rate_limit;
pub mod recover;
pub mod tracing;
