//! DTOs for shortening endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::filters::DEFAULT_PAGE_SIZE;
use crate::domain::entities::{Link, LinkFilter, Metadata, Sort};
use crate::error::AppError;

/// Body of `POST /v1/shortenings`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShorteningRequest {
    #[validate(length(min = 1, max = 2048, message = "must be provided and at most 2048 bytes"))]
    pub original_url: String,

    /// Caller-chosen identifier. Generated when absent.
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Body of `PATCH /v1/shortenings/{identifier}`.
///
/// `version`, when sent, must equal the stored version or the update fails
/// with `409 edit_conflict`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShorteningRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "must not be empty and at most 2048 bytes"))]
    pub original_url: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub version: Option<i32>,
}

/// Query string of `GET /v1/shortenings`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListShorteningsQuery {
    #[serde(default)]
    pub original_url: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub sort: Option<String>,
}

impl ListShorteningsQuery {
    /// Builds the listing filter, applying defaults and the sort safelist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a sort key outside the safelist.
    /// Page bounds are checked by the service.
    pub fn into_filter(self) -> Result<LinkFilter, AppError> {
        let sort = match self.sort.as_deref() {
            None | Some("") => Sort::default(),
            Some(value) => Sort::parse(value)?,
        };

        Ok(LinkFilter {
            original_url: self.original_url.filter(|u| !u.trim().is_empty()),
            sort,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// A shortening as returned by the API.
#[derive(Debug, Serialize)]
pub struct ShorteningResponse {
    pub identifier: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub visits: i64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl ShorteningResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            identifier: link.identifier,
            original_url: link.original_url,
            short_url,
            user_id: link.owner_user_id,
            visits: link.visits,
            version: link.version,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShorteningEnvelope {
    pub shortening: ShorteningResponse,
}

#[derive(Debug, Serialize)]
pub struct ShorteningListResponse {
    pub shortenings: Vec<ShorteningResponse>,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
