//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! bound parameters. Every call is bounded by a per-operation timeout; when it
//! elapses the query future is dropped, which cancels it, and the caller gets
//! [`AppError::Transient`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Shortenings and the redirect counter
//! - [`PgUserRepository`] - Accounts and token lookups
//! - [`PgTokenRepository`] - Token persistence
//! - [`PgPermissionRepository`] - Permission grants

pub mod pg_link_repository;
pub mod pg_permission_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_permission_repository::PgPermissionRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;

use std::future::Future;
use std::time::Duration;

use serde_json::json;

use crate::error::AppError;

/// Storage timeout used when a repository is built without an explicit one.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs a storage operation, failing with [`AppError::Transient`] once `limit`
/// has elapsed.
pub async fn with_timeout<T, F>(limit: Duration, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Storage operation timed out");
            Err(AppError::transient(
                "Storage operation timed out",
                json!({ "timeout_ms": limit.as_millis() as u64 }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_operation_is_transient() {
        let result: Result<(), AppError> = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Transient { .. })));
    }

    #[tokio::test]
    async fn test_fast_operation_passes_through() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, AppError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(AppError::not_found("missing", json!({})))
        })
        .await;
        assert!(matches!(err, Err(AppError::NotFound { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_drops_the_operation() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let _ = with_timeout(Duration::from_millis(10), async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, AppError>(())
        })
        .await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
