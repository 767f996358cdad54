//! Bearer Token Extraction
//!
//! Parses `Authorization: <scheme> <token>` request headers.

use axum::http::{HeaderMap, header};

/// Default authorization scheme
pub const BEARER_SCHEME: &str = "Bearer";

/// Error when extracting a bearer token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not valid ASCII")]
    InvalidEncoding,

    #[error("Authorization header does not use the {0} scheme")]
    WrongScheme(&'static str),

    #[error("Authorization header carries an empty token")]
    EmptyToken,
}

/// Extract the token from `Authorization: <scheme> <token>`
///
/// The scheme must match exactly and be followed by a single space.
///
/// ## Returns
/// * `Ok(&str)` - The raw token, borrowed from the header value
/// * `Err(BearerError)` - Header absent or malformed
pub fn extract_bearer<'h>(
    headers: &'h HeaderMap,
    scheme: &'static str,
) -> Result<&'h str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::MissingHeader)?
        .to_str()
        .map_err(|_| BearerError::InvalidEncoding)?;

    let token = value
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(BearerError::WrongScheme(scheme))?
        .trim();

    if token.is_empty() {
        return Err(BearerError::EmptyToken);
    }

    Ok(token)
}
