//! Application error type and its HTTP mapping.
//!
//! Every failure that can reach a handler is categorised at its origin into one
//! [`AppError`] variant. Each variant maps to exactly one status code and one
//! response shape:
//!
//! ```json
//! { "error": { "code": "edit_conflict", "message": "...", "details": {} } }
//! ```
//!
//! Authentication failures share one generic 401 body so callers cannot tell a
//! wrong token from an expired one. Internal faults are logged with their details
//! and reach the client only as a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

const GENERIC_UNAUTHORIZED: &str = "invalid or missing authentication token";
const GENERIC_INTERNAL: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    BadRequest { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    EditConflict { message: String, details: Value },
    #[error("{message}")]
    IdentifierCollision { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    MalformedToken { message: String, details: Value },
    #[error("{message}")]
    InvalidOrExpiredToken { message: String, details: Value },
    #[error("{message}")]
    InvalidCredentials { message: String, details: Value },
    #[error("{message}")]
    Forbidden { message: String, details: Value },
    #[error("{message}")]
    RateLimited { message: String, details: Value },
    #[error("{message}")]
    Transient { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn edit_conflict(details: Value) -> Self {
        Self::EditConflict {
            message: "unable to update the record due to an edit conflict, please try again"
                .to_string(),
            details,
        }
    }

    pub fn identifier_collision(details: Value) -> Self {
        Self::IdentifierCollision {
            message: "identifier already exists".to_string(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn malformed_token() -> Self {
        Self::MalformedToken {
            message: "malformed authentication token".to_string(),
            details: json!({}),
        }
    }

    pub fn invalid_or_expired_token() -> Self {
        Self::InvalidOrExpiredToken {
            message: "invalid or expired authentication token".to_string(),
            details: json!({}),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "invalid authentication credentials".to_string(),
            details: json!({}),
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited() -> Self {
        Self::RateLimited {
            message: "rate limit exceeded".to_string(),
            details: json!({}),
        }
    }

    pub fn transient(message: impl Into<String>, details: Value) -> Self {
        Self::Transient {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Whether the caller may retry the same operation unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Status code for this error category.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::EditConflict { .. } | Self::IdentifierCollision { .. } | Self::Conflict { .. } => {
                StatusCode::CONFLICT
            }
            Self::MalformedToken { .. }
            | Self::InvalidOrExpiredToken { .. }
            | Self::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = self.is_transient();

        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::BadRequest { message, details } => ("bad_request", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::EditConflict { message, details } => ("edit_conflict", message, details),
            AppError::IdentifierCollision { message, details } => {
                ("identifier_collision", message, details)
            }
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::MalformedToken { .. } | AppError::InvalidOrExpiredToken { .. } => {
                ("unauthorized", GENERIC_UNAUTHORIZED.to_string(), json!({}))
            }
            AppError::InvalidCredentials { message, .. } => ("unauthorized", message, json!({})),
            AppError::Forbidden { message, details } => ("forbidden", message, details),
            AppError::RateLimited { message, details } => ("rate_limited", message, details),
            AppError::Transient { message, details } => {
                tracing::warn!(%message, %details, "transient storage failure");
                ("service_unavailable", message, json!({}))
            }
            AppError::Internal { message, details } => {
                tracing::error!(%message, %details, "internal error");
                ("internal_error", GENERIC_INTERNAL.to_string(), json!({}))
            }
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::transient("Database temporarily unavailable", json!({ "reason": e.to_string() }))
            }
            _ => AppError::internal("Database error", json!({ "reason": e.to_string() })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::validation("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::validation("Request body has invalid fields", json!({ "reason": e.body_text() }))
            }
            other => AppError::bad_request("Malformed JSON body", json!({ "reason": other.body_text() })),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("Invalid query parameters", json!({ "reason": rejection.body_text() }))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request("Invalid path parameter", json!({ "reason": rejection.body_text() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::edit_conflict(json!({})).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::rate_limited().status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::malformed_token().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::transient("timeout", json!({})).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::forbidden("nope", json!({})).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::invalid_or_expired_token().into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_transient());
    }

    #[test]
    fn test_transient_response_asks_client_to_retry() {
        let response = AppError::transient("timeout", json!({})).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "1");

        let response = AppError::internal("boom", json!({})).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::not_found("Short link not found", json!({}));
        assert_eq!(err.to_string(), "Short link not found");
    }
}
