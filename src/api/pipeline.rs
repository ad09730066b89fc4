//! Request pipeline shared by every route.
//!
//! Outermost first: panic recovery, then rate limiting, then authentication,
//! then the routed handler. Authentication always attaches a
//! [`Principal`](crate::domain::entities::Principal) before the handler runs.

use axum::{Router, middleware};

use crate::api::middleware::{auth, rate_limit, recover};
use crate::state::AppState;

/// Wraps `router` (fallbacks included) in the pipeline.
pub fn apply(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .layer(recover::layer())
}
