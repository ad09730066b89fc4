//! User entity and its stored credential.

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque stored password hash. Never rendered by `Debug` or serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub credential: Credential,
    pub activated: bool,
    pub version: i32,
}

/// Input data for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub credential: Credential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("$argon2id$v=19$secret");
        let rendered = format!("{:?}", credential);

        assert_eq!(rendered, "Credential(***)");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_user_debug_hides_credential() {
        let user = User {
            id: 1,
            created_at: Utc::now(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            credential: Credential::new("hunter2-hash"),
            activated: true,
            version: 1,
        };

        assert!(!format!("{:?}", user).contains("hunter2"));
    }
}
