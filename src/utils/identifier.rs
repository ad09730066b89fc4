//! Short identifier generation and validation.
//!
//! Generated identifiers are the base-58 rendering of a 32-bit seed over a
//! shuffled alphabet with no `0`, `O`, `I` or `l`, so at most six characters.

use crate::error::AppError;
use serde_json::json;

/// Digit alphabet. Position is digit value.
pub const ALPHABET: &[u8; 58] = b"ynAJfoSgdXHB5VasEMtcbPCr1uNZ4LG723ehWkvwYR6KpxjTm8iQUFqz9D";

const BASE: u32 = ALPHABET.len() as u32;

pub const CUSTOM_MIN_LEN: usize = 4;
pub const CUSTOM_MAX_LEN: usize = 32;

/// Identifiers that collide with top-level routes.
const RESERVED_IDENTIFIERS: &[&str] = &["v1", "healthcheck", "api", "admin", "metrics"];

/// Renders `seed` in the identifier alphabet, most significant digit first.
///
/// Deterministic. A zero seed yields the zero digit instead of an empty string.
///
/// ```ignore
/// assert_eq!(generate(0), "y");
/// assert_eq!(generate(58), "ny");
/// ```
pub fn generate(seed: u32) -> String {
    if seed == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(6);
    let mut n = seed;
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Fresh seed for [`generate`]. Random rather than sequential because no
/// central sequence is shared between concurrent creators.
pub fn random_seed() -> u32 {
    rand::random::<u32>()
}

/// Validates a caller-chosen identifier.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_identifier(identifier: &str) -> Result<(), AppError> {
    if identifier.len() < CUSTOM_MIN_LEN || identifier.len() > CUSTOM_MAX_LEN {
        return Err(AppError::validation(
            "identifier must be 4-32 characters",
            json!({ "identifier": identifier, "provided_length": identifier.len() }),
        ));
    }

    if !identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::validation(
            "identifier can only contain letters, digits, hyphens and underscores",
            json!({ "identifier": identifier }),
        ));
    }

    if identifier.starts_with('-') || identifier.ends_with('-') {
        return Err(AppError::validation(
            "identifier cannot start or end with a hyphen",
            json!({ "identifier": identifier }),
        ));
    }

    if RESERVED_IDENTIFIERS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(identifier))
    {
        return Err(AppError::validation(
            "identifier is reserved",
            json!({ "identifier": identifier }),
        ));
    }

    Ok(())
}
