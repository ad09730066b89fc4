//! Handlers for user registration and activation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::user::{ActivateUserRequest, RegisterUserRequest, UserEnvelope};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new, not yet activated account.
///
/// # Endpoint
///
/// `POST /v1/users`
///
/// Responds `202 Accepted`: the activation token is delivered out of band.
///
/// # Errors
///
/// - `422` for invalid name, e-mail or password
/// - `409 conflict` if the e-mail is already registered
pub async fn register_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let Json(payload) = payload?;

    let user = state.user_service.register(payload.into()).await?;

    Ok((StatusCode::ACCEPTED, Json(UserEnvelope { user: user.into() })))
}

/// Exchanges an activation token for an activated account.
///
/// # Endpoint
///
/// `PUT /v1/users/activated`
pub async fn activate_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivateUserRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, AppError> {
    let Json(payload) = payload?;

    let user = state.user_service.activate(&payload.token).await?;

    Ok(Json(UserEnvelope { user: user.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{TestState, test_user};
    use crate::domain::entities::TokenScope;
    use axum::{
        Router,
        routing::{post, put},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    fn server(test: TestState) -> TestServer {
        let app = Router::new()
            .route("/v1/users", post(register_user_handler))
            .route("/v1/users/activated", put(activate_user_handler))
            .with_state(test.into_state());
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_register_accepted() {
        let mut test = TestState::new();
        test.verifier
            .expect_hash()
            .returning(|_| Ok("$argon2id$hashed".to_string()));
        test.users
            .expect_insert()
            .withf(|u| u.email == "alice@example.com")
            .returning(|_| Ok(test_user(false)));
        test.permissions
            .expect_add_for_user()
            .returning(|_, _| Ok(()));
        test.tokens.expect_insert().returning(|_| Ok(()));
        test.notifier
            .expect_send_activation()
            .times(1)
            .returning(|_, _| Ok(()));

        let response = server(test)
            .post("/v1/users")
            .json(&json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "correct horse"
            }))
            .await;

        response.assert_status(StatusCode::ACCEPTED);
        let body: Value = response.json();
        assert_eq!(body["user"]["activated"], false);
        assert!(body["user"].get("credential").is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut test = TestState::new();
        test.users.expect_insert().never();

        let response = server(test)
            .post("/v1/users")
            .json(&json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "short"
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_activate_with_valid_token() {
        let mut test = TestState::new();
        test.users
            .expect_get_for_token()
            .withf(|scope, _, _| *scope == TokenScope::Activation)
            .returning(|_, _, _| Ok(Some(test_user(false))));
        test.users
            .expect_update()
            .withf(|u| u.activated)
            .returning(|u| Ok(u.clone()));
        test.tokens
            .expect_delete_all_for_user()
            .times(1)
            .returning(|_, _| Ok(()));

        let response = server(test)
            .put("/v1/users/activated")
            .json(&json!({ "token": "ABCDEFGHIJKLMNOPQRSTUVWXYZ" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["user"]["activated"], true);
    }

    #[tokio::test]
    async fn test_activate_with_malformed_token() {
        let mut test = TestState::new();
        test.users.expect_get_for_token().never();

        let response = server(test)
            .put("/v1/users/activated")
            .json(&json!({ "token": "nope" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
