//! Bearer token authentication middleware and the [`Principal`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_auth::AuthBearer;

use crate::{domain::entities::Principal, error::AppError, state::AppState};

/// Reads the bearer token from the `Authorization` header.
///
/// A missing header is not an error and yields `None`. A header that is
/// present but is not `Bearer <token>` is treated as a malformed token.
pub async fn bearer_token(parts: &mut Parts) -> Result<Option<String>, AppError> {
    if !parts.headers.contains_key(header::AUTHORIZATION) {
        return Ok(None);
    }

    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| AppError::malformed_token())?;

    Ok(Some(token))
}

/// Resolves the request's principal and attaches it to the request extensions.
///
/// Runs for every request. Requests without an `Authorization` header
/// continue as [`Principal::Anonymous`]; a token that is malformed, unknown
/// or expired stops the request with `401 Unauthorized`.
///
/// `Vary: Authorization` is added to every response that passes through,
/// since the body depends on who asked.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::api::middleware::auth;
///
/// let app = Router::new()
///     .route("/v1/me/shortenings", get(list_my_shortenings_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let principal = match bearer_token(&mut parts).await {
        Ok(token) => st.auth_service.authenticate(token.as_deref()).await,
        Err(e) => Err(e),
    };

    let mut response = match principal {
        Ok(principal) => {
            parts.extensions.insert(principal);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

/// Handlers take the principal as an ordinary argument.
///
/// The authentication layer always attaches one. If a route is mounted
/// without that layer the token is resolved here instead, so a handler never
/// runs without an identity.
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let token = bearer_token(parts).await?;
        let principal = state.auth_service.authenticate(token.as_deref()).await?;
        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}
