//! Utility functions and helpers

use crate::error::{Result, RestError};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

/// Characters escaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize URL
    pub fn validate_url(input: &str) -> Result<Url> {
        // Add http:// if no scheme is provided
        let url_str = if Self::has_scheme(input) {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| RestError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }

    /// Only the authority part may carry `scheme://`; a `://` inside the
    /// path or query does not count.
    fn has_scheme(input: &str) -> bool {
        let head_len = input
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(input.len());
        input[..head_len].ends_with(':') && input[head_len..].starts_with("//")
    }
}

/// Percent-encode a query value the way browsers' `encodeURIComponent` does.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT_ENCODE_SET).to_string()
}

/// Milliseconds since the Unix epoch, used for cache-busting.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
