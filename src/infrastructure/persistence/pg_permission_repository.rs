//! PostgreSQL implementation of permission repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_STORE_TIMEOUT, with_timeout};
use crate::domain::entities::Permissions;
use crate::domain::repositories::PermissionRepository;
use crate::error::AppError;

pub struct PgPermissionRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgPermissionRepository {
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
impl PermissionRepository for PgPermissionRepository {
    async fn get_all_for_user(&self, user_id: i64) -> Result<Permissions, AppError> {
        with_timeout(self.timeout, async {
            let codes = sqlx::query_scalar::<_, String>(
                r#"
                SELECT permissions.code
                FROM permissions
                INNER JOIN users_permissions ON users_permissions.permission_id = permissions.id
                WHERE users_permissions.user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

            Ok(Permissions::new(codes))
        })
        .await
    }

    async fn add_for_user(&self, user_id: i64, codes: Vec<String>) -> Result<(), AppError> {
        with_timeout(self.timeout, async {
            let known = sqlx::query_scalar::<_, String>(
                "SELECT code FROM permissions WHERE code = ANY($1)",
            )
            .bind(&codes)
            .fetch_all(self.pool.as_ref())
            .await?;

            let unknown: Vec<&String> = codes.iter().filter(|c| !known.contains(c)).collect();
            if !unknown.is_empty() {
                return Err(AppError::validation(
                    "Unknown permission code",
                    json!({ "codes": unknown }),
                ));
            }

            sqlx::query(
                r#"
                INSERT INTO users_permissions (user_id, permission_id)
                SELECT $1, permissions.id FROM permissions WHERE permissions.code = ANY($2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(&codes)
            .execute(self.pool.as_ref())
            .await?;

            Ok(())
        })
        .await
    }
}
