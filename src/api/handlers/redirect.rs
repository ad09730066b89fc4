//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an identifier to its original URL and counts the visit.
///
/// # Endpoint
///
/// `GET /{identifier}`
///
/// Reading the URL and incrementing `visits` happen in one atomic statement,
/// so concurrent redirects never lose a count.
///
/// # Errors
///
/// Returns 404 Not Found if the identifier doesn't exist.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.resolve(&identifier).await?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, original_url)],
    ))
}
