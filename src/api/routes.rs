//! API route configuration.
//!
//! Permission checks happen inside the handlers against the request's
//! principal; the route table itself is open.

use crate::api::handlers::{
    activate_user_handler, create_authentication_token_handler, create_shortening_handler,
    delete_shortening_handler, health_handler, list_my_shortenings_handler,
    list_shortenings_handler, method_not_allowed_handler, register_user_handler,
    show_shortening_handler, update_shortening_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Versioned API routes, mounted under `/v1`.
///
/// # Endpoints
///
/// - `GET    /healthcheck`                - Service status
/// - `POST   /users`                      - Register an account
/// - `PUT    /users/activated`            - Activate an account
/// - `POST   /tokens/authentication`      - Issue a bearer token
/// - `GET    /shortenings`                - List shortenings (`shortenings:read`)
/// - `POST   /shortenings`                - Create a shortening (`shortenings:write`)
/// - `GET    /shortenings/{identifier}`   - Show a shortening (`shortenings:read`)
/// - `PATCH  /shortenings/{identifier}`   - Update a shortening (`shortenings:write`)
/// - `DELETE /shortenings/{identifier}`   - Delete a shortening (`shortenings:write`)
/// - `GET    /me/shortenings`             - The caller's shortenings
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(health_handler))
        .route("/users", post(register_user_handler))
        .route("/users/activated", put(activate_user_handler))
        .route(
            "/tokens/authentication",
            post(create_authentication_token_handler),
        )
        .route(
            "/shortenings",
            get(list_shortenings_handler).post(create_shortening_handler),
        )
        .route(
            "/shortenings/{identifier}",
            get(show_shortening_handler)
                .patch(update_shortening_handler)
                .delete(delete_shortening_handler),
        )
        .route("/me/shortenings", get(list_my_shortenings_handler))
        .method_not_allowed_fallback(method_not_allowed_handler)
}
