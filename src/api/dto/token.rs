//! DTOs for authentication token issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::AuthToken;

/// Body of `POST /v1/tokens/authentication`.
#[derive(Debug, Deserialize)]
pub struct CreateAuthenticationTokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl From<AuthToken> for TokenResponse {
    fn from(token: AuthToken) -> Self {
        Self {
            token: token.plaintext,
            expiry: token.expiry,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticationTokenEnvelope {
    pub authentication_token: TokenResponse,
}
