//! HTTP request handlers.

pub(crate) mod docs;
pub(crate) mod retrieve;

use axum::http::{HeaderMap, header};
use md5::{Digest, Md5};

use crate::error::ServerError;

/// `Cache-Control` value for documentation responses.
pub(crate) const DOCS_CACHE_CONTROL: &str = "public, max-age=300, s-maxage=300";

/// Unwrap a query parameter, treating blank values as missing.
pub(crate) fn required(value: Option<String>, name: &'static str) -> Result<String, ServerError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ServerError::MissingParameter(name))
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Returns `true` if the request's `If-None-Match` matches `etag`.
pub(crate) fn is_not_modified(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == etag.as_bytes())
}
