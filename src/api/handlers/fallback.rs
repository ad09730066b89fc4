//! Responses for unmatched routes and methods.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;

pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found(
        "the requested resource could not be found",
        json!({ "path": uri.path() }),
    )
}

/// `405` in the common error shape.
pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> Response {
    let body = json!({
        "error": {
            "code": "method_not_allowed",
            "message": format!("the {method} method is not supported for this resource"),
            "details": { "path": uri.path() },
        }
    });

    (StatusCode::METHOD_NOT_ALLOWED, axum::Json(body)).into_response()
}
