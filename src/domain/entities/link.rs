//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// `version` starts at 1 and grows by exactly one on every successful
/// [`update`](crate::domain::repositories::LinkRepository::update). Redirects
/// increment `visits` without touching `version`: counting a visit is not an
/// edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub identifier: String,
    pub original_url: String,
    pub owner_user_id: Option<i64>,
    pub visits: i64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        identifier: String,
        original_url: String,
        owner_user_id: Option<i64>,
        visits: i64,
        version: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier,
            original_url,
            owner_user_id,
            visits,
            version,
            created_at,
        }
    }

    /// Returns true if `user_id` owns this link.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_user_id == Some(user_id)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub identifier: String,
    pub original_url: String,
    pub owner_user_id: Option<i64>,
}
