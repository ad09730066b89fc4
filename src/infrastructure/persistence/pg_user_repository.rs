//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_STORE_TIMEOUT, with_timeout};
use crate::domain::entities::{Credential, NewUser, TokenScope, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::db_error::{USERS_EMAIL_KEY, is_unique_violation_on};

const USER_COLUMNS: &str =
    "users.id, users.created_at, users.name, users.email, users.password_hash, users.activated, users.version";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    password_hash: String,
    activated: bool,
    version: i32,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            created_at: r.created_at,
            name: r.name,
            email: r.email,
            credential: Credential::new(r.password_hash),
            activated: r.activated,
            version: r.version,
        }
    }
}

fn duplicate_email(e: sqlx::Error, email: &str) -> AppError {
    if is_unique_violation_on(&e, USERS_EMAIL_KEY) {
        AppError::conflict(
            "A user with this email address already exists",
            json!({ "email": email }),
        )
    } else {
        e.into()
    }
}

pub struct PgUserRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUserRepository {
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
impl UserRepository for PgUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, activated) \
             VALUES ($1, $2, $3, false) RETURNING {USER_COLUMNS}"
        );

        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(&new_user.name)
                .bind(&new_user.email)
                .bind(new_user.credential.as_str())
                .fetch_one(self.pool.as_ref())
                .await
                .map_err(|e| duplicate_email(e, &new_user.email))?;

            Ok(row.into())
        })
        .await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(email)
                .fetch_optional(self.pool.as_ref())
                .await?;

            Ok(row.map(User::from))
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users \
             SET name = $1, email = $2, password_hash = $3, activated = $4, version = version + 1 \
             WHERE id = $5 AND version = $6 \
             RETURNING {USER_COLUMNS}"
        );

        with_timeout(self.timeout, async {
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(&user.name)
                .bind(&user.email)
                .bind(user.credential.as_str())
                .bind(user.activated)
                .bind(user.id)
                .bind(user.version)
                .fetch_optional(self.pool.as_ref())
                .await
                .map_err(|e| duplicate_email(e, &user.email))?
                .map(User::from)
                .ok_or_else(|| {
                    AppError::edit_conflict(json!({
                        "user_id": user.id,
                        "expected_version": user.version,
                    }))
                })
        })
        .await
    }

    async fn get_for_token(
        &self,
        scope: TokenScope,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             INNER JOIN tokens ON users.id = tokens.user_id \
             WHERE tokens.hash = $1 AND tokens.scope = $2 AND tokens.expiry > $3"
        );

        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(token_hash)
                .bind(scope.as_str())
                .bind(now)
                .fetch_optional(self.pool.as_ref())
                .await?;

            Ok(row.map(User::from))
        })
        .await
    }
}
