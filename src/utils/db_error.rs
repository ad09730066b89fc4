//! Helpers for inspecting `sqlx` database errors at their origin.

/// Primary key of the `shortenings` table.
pub const SHORTENINGS_PKEY: &str = "shortenings_pkey";
/// Unique index on `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Returns `true` if `e` is a unique violation of the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
