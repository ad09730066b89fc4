//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Recovery, rate limiting, authentication and tracing
//! - [`pipeline`] - Composition of the per-request middleware chain
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod routes;

#[cfg(test)]
pub(crate) mod test_support;
