//! URL normalization for stored original URLs and short URL construction.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Longest original URL accepted, after normalization.
pub const MAX_URL_LEN: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("only http and https URLs are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL must not be longer than {MAX_URL_LEN} bytes")]
    TooLong,

    #[error("failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

impl From<UrlNormalizationError> for AppError {
    fn from(e: UrlNormalizationError) -> Self {
        AppError::validation(e.to_string(), json!({ "field": "original_url" }))
    }
}

/// Normalizes an original URL to a canonical form.
///
/// Only `http` and `https` are accepted. The host is lowercased, the fragment
/// dropped and a default port removed. Path and query are kept as given.
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
        return Err(UrlNormalizationError::MissingHost);
    };
    let host = host.to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlNormalizationError::NormalizationFailed(e.to_string()))?;

    url.set_fragment(None);

    if matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("failed to remove default port".into())
        })?;
    }

    let normalized = String::from(url);
    if normalized.len() > MAX_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    Ok(normalized)
}

/// Builds the public short URL by replacing the path of `base_url` with the
/// identifier.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] if `base_url` does not parse.
pub fn short_url(base_url: &str, identifier: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(base_url).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;
    url.set_path(identifier);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.into())
}
