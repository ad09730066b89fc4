//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_STORE_TIMEOUT, with_timeout};
use crate::domain::entities::{Link, LinkFilter, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::{SHORTENINGS_PKEY, is_unique_violation_on};

const LINK_COLUMNS: &str = "identifier, original_url, user_id, visits, version, created_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    identifier: String,
    original_url: String,
    user_id: Option<i64>,
    visits: i64,
    version: i32,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.identifier,
            r.original_url,
            r.user_id,
            r.visits,
            r.version,
            r.created_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct LinkPageRow {
    total_records: i64,
    #[sqlx(flatten)]
    link: LinkRow,
}

/// PostgreSQL repository for shortenings.
///
/// Version checks and the visit counter are single conditional statements, so
/// concurrency control is left to PostgreSQL row locking.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgLinkRepository {
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
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO shortenings (identifier, original_url, user_id) \
             VALUES ($1, $2, $3) RETURNING {LINK_COLUMNS}"
        );

        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, LinkRow>(&sql)
                .bind(&new_link.identifier)
                .bind(&new_link.original_url)
                .bind(new_link.owner_user_id)
                .fetch_one(self.pool.as_ref())
                .await
                .map_err(|e| {
                    if is_unique_violation_on(&e, SHORTENINGS_PKEY) {
                        AppError::identifier_collision(json!({
                            "identifier": new_link.identifier,
                        }))
                    } else {
                        AppError::from(e)
                    }
                })?;

            Ok(row.into())
        })
        .await
    }

    async fn get(&self, identifier: &str) -> Result<Link, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM shortenings WHERE identifier = $1");

        with_timeout(self.timeout, async {
            sqlx::query_as::<_, LinkRow>(&sql)
                .bind(identifier)
                .fetch_optional(self.pool.as_ref())
                .await?
                .map(Link::from)
                .ok_or_else(|| {
                    AppError::not_found(
                        "Shortening not found",
                        json!({ "identifier": identifier }),
                    )
                })
        })
        .await
    }

    async fn update(&self, link: &Link) -> Result<Link, AppError> {
        let sql = format!(
            "UPDATE shortenings SET original_url = $1, version = version + 1 \
             WHERE identifier = $2 AND version = $3 RETURNING {LINK_COLUMNS}"
        );

        with_timeout(self.timeout, async {
            sqlx::query_as::<_, LinkRow>(&sql)
                .bind(&link.original_url)
                .bind(&link.identifier)
                .bind(link.version)
                .fetch_optional(self.pool.as_ref())
                .await?
                .map(Link::from)
                .ok_or_else(|| {
                    AppError::edit_conflict(json!({
                        "identifier": link.identifier,
                        "expected_version": link.version,
                    }))
                })
        })
        .await
    }

    async fn delete(&self, identifier: &str) -> Result<(), AppError> {
        with_timeout(self.timeout, async {
            let result = sqlx::query("DELETE FROM shortenings WHERE identifier = $1")
                .bind(identifier)
                .execute(self.pool.as_ref())
                .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(
                    "Shortening not found",
                    json!({ "identifier": identifier }),
                ));
            }
            Ok(())
        })
        .await
    }

    async fn resolve_and_count(&self, identifier: &str) -> Result<String, AppError> {
        // Read and increment in one statement: the row lock serialises
        // concurrent redirects and a failed statement counts nothing.
        with_timeout(self.timeout, async {
            sqlx::query_scalar::<_, String>(
                r#"
                UPDATE shortenings
                SET visits = visits + 1
                WHERE identifier = $1
                RETURNING original_url
                "#,
            )
            .bind(identifier)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| {
                AppError::not_found("Shortening not found", json!({ "identifier": identifier }))
            })
        })
        .await
    }

    async fn list(&self, filter: &LinkFilter) -> Result<(Vec<Link>, i64), AppError> {
        // Column and direction come from the sort safelist, never from input.
        let sql = format!(
            "SELECT count(*) OVER() AS total_records, {LINK_COLUMNS} \
             FROM shortenings \
             WHERE ($1::text IS NULL OR LOWER(original_url) = LOWER($1)) \
             ORDER BY {} {}, identifier ASC \
             LIMIT $2 OFFSET $3",
            filter.sort.column(),
            filter.sort.direction(),
        );

        with_timeout(self.timeout, async {
            let rows = sqlx::query_as::<_, LinkPageRow>(&sql)
                .bind(filter.original_url.as_deref())
                .bind(filter.limit())
                .bind(filter.offset())
                .fetch_all(self.pool.as_ref())
                .await?;

            let total = rows.first().map(|r| r.total_records).unwrap_or(0);
            let links = rows.into_iter().map(|r| r.link.into()).collect();

            Ok((links, total))
        })
        .await
    }

    async fn list_for_owner(&self, user_id: i64) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM shortenings WHERE user_id = $1 \
             ORDER BY created_at DESC, identifier ASC"
        );

        with_timeout(self.timeout, async {
            let rows = sqlx::query_as::<_, LinkRow>(&sql)
                .bind(user_id)
                .fetch_all(self.pool.as_ref())
                .await?;

            Ok(rows.into_iter().map(Link::from).collect())
        })
        .await
    }
}
