//! Liveness and dependency check.

use axum::{Json, extract::State, http::StatusCode};
use tracing::warn;

use crate::api::dto::health::{
    ComponentCheck, ComponentState, HealthChecks, HealthResponse, ServiceStatus, SystemInfo,
};
use crate::state::AppState;

/// Reports service status and whether the database answers.
///
/// # Endpoint
///
/// `GET /v1/healthcheck`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: The database did not answer
///
/// # Response
///
/// ```json
/// {
///   "status": "available",
///   "system_info": { "environment": "production", "version": "0.1.0" },
///   "checks": { "database": { "status": "ok" } }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let status = match database.state {
        ComponentState::Error => ServiceStatus::Degraded,
        ComponentState::Ok | ComponentState::Skipped => ServiceStatus::Available,
    };

    let response = HealthResponse {
        status,
        system_info: SystemInfo {
            environment: state.environment.clone(),
            version: env!("CARGO_PKG_VERSION"),
        },
        checks: HealthChecks { database },
    };

    match status {
        ServiceStatus::Available => Ok(Json(response)),
        ServiceStatus::Degraded => Err((StatusCode::SERVICE_UNAVAILABLE, Json(response))),
    }
}

async fn check_database(state: &AppState) -> ComponentCheck {
    let Some(pool) = &state.pool else {
        return ComponentCheck::skipped("no database configured");
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => ComponentCheck::ok(),
        Err(e) => {
            warn!(error = %e, "Health check query failed");
            ComponentCheck::failed(format!("database error: {e}"))
        }
    }
}
