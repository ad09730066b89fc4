//! Utility functions for identifiers, tokens, URLs and database errors.
//!
//! - [`identifier`] - Short identifier generation and custom identifier checks
//! - [`token`] - Token plaintext generation, hashing and validation
//! - [`url_normalizer`] - URL normalization and short URL construction
//! - [`db_error`] - Classification of PostgreSQL constraint violations

pub mod db_error;
pub mod identifier;
pub mod token;
pub mod url_normalizer;
