#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use link_shortener::config::Config;
use link_shortener::domain::entities::{AuthToken, NewLink, TokenScope};
use link_shortener::domain::repositories::{LinkRepository, TokenRepository};
use link_shortener::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};
use link_shortener::server::build_state;
use link_shortener::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        base_url: BASE_URL.to_string(),
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        limiter_enabled: false,
        limiter_rps: 2.0,
        limiter_burst: 4,
        limiter_sweep_interval_secs: 60,
        limiter_idle_timeout_secs: 180,
        store_timeout_ms: 3000,
        db_max_connections: 25,
        db_connect_timeout: 30,
        db_idle_timeout: 900,
        db_max_lifetime: 1800,
        shutdown_grace_secs: 1,
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    build_state(&test_config(), pool)
}

pub fn link_repo(pool: &PgPool) -> PgLinkRepository {
    PgLinkRepository::new(Arc::new(pool.clone()))
}

pub async fn create_test_user(pool: &PgPool, email: &str, activated: bool) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, activated) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind("Test User")
    .bind(email)
    .bind("not-a-real-hash")
    .bind(activated)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_test_link(pool: &PgPool, identifier: &str, url: &str) {
    link_repo(pool)
        .create(NewLink {
            identifier: identifier.to_string(),
            original_url: url.to_string(),
            owner_user_id: None,
        })
        .await
        .unwrap();
}

/// Stores a token for `user_id` expiring `ttl` from now and returns it.
pub async fn create_test_token(
    pool: &PgPool,
    user_id: i64,
    scope: TokenScope,
    ttl: Duration,
) -> AuthToken {
    let token = AuthToken::generate(user_id, ttl, scope, Utc::now()).unwrap();
    PgTokenRepository::new(Arc::new(pool.clone()))
        .insert(&token)
        .await
        .unwrap();
    token
}

pub async fn visits(pool: &PgPool, identifier: &str) -> i64 {
    sqlx::query_scalar("SELECT visits FROM shortenings WHERE identifier = $1")
        .bind(identifier)
        .fetch_one(pool)
        .await
        .unwrap()
}
