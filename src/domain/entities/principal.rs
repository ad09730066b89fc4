//! Request principal and permission codes.

use std::collections::HashSet;

use crate::domain::entities::User;

/// Permission required to read shortenings.
pub const SHORTENINGS_READ: &str = "shortenings:read";
/// Permission required to create, edit or delete shortenings.
pub const SHORTENINGS_WRITE: &str = "shortenings:write";

/// The identity a request runs as.
///
/// Unauthenticated access is a valid identity of its own, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User(User),
}

impl Principal {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }
}

/// Set of permission codes granted to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions(HashSet<String>);

impl Permissions {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(codes.into_iter().map(Into::into).collect())
    }

    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
