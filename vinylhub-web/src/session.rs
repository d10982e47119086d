//! Bearer token identity
//!
//! Collections are keyed per bearer token. The raw token never touches the
//! database; the SHA-256 hex digest of the token is stored as `session_key`.

use axum::http::{header, HeaderMap};
use sha2::{Digest, Sha256};

/// Extract the bearer token from the `Authorization` header
///
/// Returns `None` when the header is absent or not a `Bearer` scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Database key for a bearer token (SHA-256 hex digest)
pub fn session_key(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    format!("{:x}", hash)
}
