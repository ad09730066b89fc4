//! Bearer tokens for account activation and API authentication.

use chrono::{DateTime, Duration, Utc};

use crate::error::AppError;
use crate::utils::token::{generate_plaintext, hash_plaintext};

/// What a token may be exchanged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Activation,
    Authentication,
}

impl TokenScope {
    /// Value stored in the `tokens.scope` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Activation => "activation",
            TokenScope::Authentication => "authentication",
        }
    }

    /// Default lifetime of a token in this scope.
    pub fn default_ttl(&self) -> Duration {
        match self {
            TokenScope::Activation => Duration::days(3),
            TokenScope::Authentication => Duration::hours(24),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "activation" => Some(TokenScope::Activation),
            "authentication" => Some(TokenScope::Authentication),
            _ => None,
        }
    }
}

/// A token row. `plaintext` is only populated right after generation and is
/// never persisted; storage keeps the SHA-256 `hash`.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub plaintext: String,
    pub hash: Vec<u8>,
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
}

impl AuthToken {
    /// Mints a fresh random token expiring `ttl` after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the OS random source fails.
    pub fn generate(
        user_id: i64,
        ttl: Duration,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let plaintext = generate_plaintext()?;
        let hash = hash_plaintext(&plaintext);

        Ok(Self {
            plaintext,
            hash,
            user_id,
            expiry: now + ttl,
            scope,
        })
    }
}
