//! DTOs for user registration and activation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::Registration;
use crate::domain::entities::User;

/// Body of `POST /v1/users`. Validated by the service.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterUserRequest> for Registration {
    fn from(req: RegisterUserRequest) -> Self {
        Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Body of `PUT /v1/users/activated`.
#[derive(Debug, Deserialize)]
pub struct ActivateUserRequest {
    pub token: String,
}

/// A user as returned by the API. The credential is never included.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub activated: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            name: user.name,
            email: user.email,
            activated: user.activated,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}
