//! Token plaintext generation, hashing and validation.
//!
//! A plaintext is 16 random bytes in RFC 4648 base32 without padding, which is
//! always 26 characters. Only its SHA-256 digest is stored.

use crate::error::AppError;
use data_encoding::BASE32_NOPAD;
use serde_json::json;
use sha2::{Digest, Sha256};

const TOKEN_ENTROPY_BYTES: usize = 16;

pub const TOKEN_PLAINTEXT_LEN: usize = 26;

/// # Errors
///
/// Returns [`AppError::Internal`] if the OS random source fails.
pub fn generate_plaintext() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_ENTROPY_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(BASE32_NOPAD.encode(&buffer))
}

pub fn hash_plaintext(plaintext: &str) -> Vec<u8> {
    Sha256::digest(plaintext.as_bytes()).to_vec()
}

/// Checks the plaintext shape without touching storage.
///
/// # Errors
///
/// Returns [`AppError::MalformedToken`] unless the input is exactly 26
/// characters of the base32 alphabet.
pub fn validate_plaintext(plaintext: &str) -> Result<(), AppError> {
    let well_formed = plaintext.len() == TOKEN_PLAINTEXT_LEN
        && plaintext
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b));

    if well_formed {
        Ok(())
    } else {
        Err(AppError::malformed_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_plaintext_is_valid() {
        let token = generate_plaintext().unwrap();

        assert_eq!(token.len(), TOKEN_PLAINTEXT_LEN);
        assert!(validate_plaintext(&token).is_ok());
    }

    #[test]
    fn test_generated_plaintexts_are_unique() {
        let tokens: HashSet<String> = (0..500).map(|_| generate_plaintext().unwrap()).collect();
        assert_eq!(tokens.len(), 500);
    }

    #[test]
    fn test_hash_is_deterministic_sha256() {
        let a = hash_plaintext("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let b = hash_plaintext("ABCDEFGHIJKLMNOPQRSTUVWXYZ");

        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, hash_plaintext("ABCDEFGHIJKLMNOPQRSTUVWXY2"));
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        assert!(matches!(
            validate_plaintext("SHORT"),
            Err(AppError::MalformedToken { .. })
        ));
        assert!(validate_plaintext(&"A".repeat(27)).is_err());
        assert!(validate_plaintext("").is_err());
    }

    #[test]
    fn test_validate_rejects_non_base32_characters() {
        assert!(validate_plaintext("abcdefghijklmnopqrstuvwxyz").is_err());
        assert!(validate_plaintext("ABCDEFGHIJKLMNOPQRSTUVWXY1").is_err());
        assert!(validate_plaintext("ABCDEFGHIJKLMNOPQRSTUVWXY=").is_err());
    }
}
