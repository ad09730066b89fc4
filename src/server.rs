//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, service wiring, the rate limiter sweeper, and
//! the Axum server lifecycle including graceful shutdown.

use crate::application::services::{AuthService, LinkService, UserService};
use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::infrastructure::persistence::{
    PgLinkRepository, PgPermissionRepository, PgTokenRepository, PgUserRepository,
};
use crate::infrastructure::{ArgonCredentialVerifier, ClientRateLimiter, LogNotifier};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Opens the connection pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Wires repositories and services into the shared application state.
pub fn build_state(config: &Config, pool: PgPool) -> AppState {
    let timeout = config.store_timeout();
    let shared = Arc::new(pool.clone());

    let links = Arc::new(PgLinkRepository::new(shared.clone()).with_store_timeout(timeout));
    let users = Arc::new(PgUserRepository::new(shared.clone()).with_store_timeout(timeout));
    let tokens = Arc::new(PgTokenRepository::new(shared.clone()).with_store_timeout(timeout));
    let permissions =
        Arc::new(PgPermissionRepository::new(shared).with_store_timeout(timeout));
    let clock = Arc::new(SystemClock);

    AppState {
        link_service: Arc::new(LinkService::new(links, config.base_url.clone())),
        auth_service: Arc::new(AuthService::new(
            users.clone(),
            permissions.clone(),
            clock.clone(),
        )),
        user_service: Arc::new(UserService::new(
            users,
            tokens,
            permissions,
            Arc::new(ArgonCredentialVerifier),
            Arc::new(LogNotifier),
            clock,
        )),
        rate_limiter: Arc::new(ClientRateLimiter::new(config.rate_limiter())),
        pool: Some(pool),
        environment: config.environment.clone(),
        behind_proxy: config.behind_proxy,
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Rate limiter and its idle-client sweeper
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the listener stops accepting, in-flight requests get
/// `SHUTDOWN_GRACE_SECS` to finish, and the sweeper is stopped last.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let state = build_state(&config, pool);
    let sweeper = state.rate_limiter.spawn_sweeper();

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    })
    .into_future();

    let grace = Duration::from_secs(config.shutdown_grace_secs);
    tokio::select! {
        result = server => result.context("Server error")?,
        _ = async {
            let _ = stop_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_secs = config.shutdown_grace_secs, "Grace period elapsed, dropping in-flight requests");
        }
    }

    sweeper.stop().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
