//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_STORE_TIMEOUT, with_timeout};
use crate::domain::entities::{AuthToken, TokenScope};
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

/// Stores SHA-256 token hashes. Plaintexts are never persisted.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgTokenRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn insert(&self, token: &AuthToken) -> Result<(), AppError> {
        with_timeout(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO tokens (hash, user_id, expiry, scope)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&token.hash)
            .bind(token.user_id)
            .bind(token.expiry)
            .bind(token.scope.as_str())
            .execute(self.pool.as_ref())
            .await?;

            Ok(())
        })
        .await
    }

    async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64) -> Result<(), AppError> {
        with_timeout(self.timeout, async {
            sqlx::query("DELETE FROM tokens WHERE scope = $1 AND user_id = $2")
                .bind(scope.as_str())
                .bind(user_id)
                .execute(self.pool.as_ref())
                .await?;

            Ok(())
        })
        .await
    }
}
