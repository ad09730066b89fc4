//! Panic recovery for the request pipeline.

use std::any::Any;

use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Outermost pipeline stage.
///
/// A panic anywhere below becomes a generic `500` with `Connection: close`
/// and the panic payload is logged.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Converts a caught panic payload into the internal-error response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    let mut response =
        AppError::internal("handler panicked", json!({ "panic": detail })).into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
