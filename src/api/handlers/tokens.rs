//! Handler for issuing authentication tokens.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::token::{AuthenticationTokenEnvelope, CreateAuthenticationTokenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges e-mail and password for a bearer token.
///
/// # Endpoint
///
/// `POST /v1/tokens/authentication`
///
/// # Response
///
/// ```json
/// { "authentication_token": { "token": "X3ASTT2CDAN66BACKSCI4SU7SI", "expiry": "2026-03-02T10:00:00Z" } }
/// ```
///
/// The plaintext token appears only in this response.
///
/// # Errors
///
/// `401` for an unknown e-mail or a wrong password; the two are not told apart.
pub async fn create_authentication_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateAuthenticationTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthenticationTokenEnvelope>), AppError> {
    let Json(payload) = payload?;

    let token = state
        .user_service
        .issue_authentication_token(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthenticationTokenEnvelope {
            authentication_token: token.into(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{TestState, now, test_user};
    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::{Value, json};

    fn server(test: TestState) -> TestServer {
        let app = Router::new()
            .route(
                "/v1/tokens/authentication",
                post(create_authentication_token_handler),
            )
            .with_state(test.into_state());
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_issue_token() {
        let mut test = TestState::new();
        test.users
            .expect_get_by_email()
            .returning(|_| Ok(Some(test_user(true))));
        test.verifier.expect_verify().returning(|_, _| Ok(true));
        test.tokens.expect_insert().times(1).returning(|_| Ok(()));

        let response = server(test)
            .post("/v1/tokens/authentication")
            .json(&json!({ "email": "alice@example.com", "password": "correct horse" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let token = body["authentication_token"]["token"].as_str().unwrap();
        assert_eq!(token.len(), 26);
        let expiry: chrono::DateTime<chrono::Utc> =
            serde_json::from_value(body["authentication_token"]["expiry"].clone()).unwrap();
        assert_eq!(expiry, now() + Duration::hours(24));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let mut test = TestState::new();
        test.users
            .expect_get_by_email()
            .returning(|_| Ok(Some(test_user(true))));
        test.verifier.expect_verify().returning(|_, _| Ok(false));
        test.tokens.expect_insert().never();

        let response = server(test)
            .post("/v1/tokens/authentication")
            .json(&json!({ "email": "alice@example.com", "password": "wrong password" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
