//! Health check response body.

use serde::Serialize;

/// Overall service state. `degraded` when a required component failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Available,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Ok,
    Error,
    /// The component is not configured in this process.
    Skipped,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub system_info: SystemInfo,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub environment: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: ComponentCheck,
}

#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    #[serde(rename = "status")]
    pub state: ComponentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentCheck {
    pub fn ok() -> Self {
        Self {
            state: ComponentState::Ok,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: ComponentState::Error,
            message: Some(message.into()),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            state: ComponentState::Skipped,
            message: Some(message.into()),
        }
    }
}
