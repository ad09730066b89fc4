//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{identifier}` - Short link redirect (public)
//! - `/v1/*`              - Versioned JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging (outermost)
//! - **Request pipeline** - Panic recovery, per-client rate limiting and
//!   authentication, applied to every route and to the fallbacks
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{method_not_allowed_handler, not_found_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::api::pipeline;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// Whether the rate limiter trusts proxy headers is taken from
/// [`AppState::behind_proxy`].
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .nest("/v1", api::routes::v1_routes())
        .route("/{identifier}", get(redirect_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler);

    let router = pipeline::apply(router, &state)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
