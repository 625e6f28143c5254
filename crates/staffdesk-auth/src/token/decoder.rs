//! Payload-only JWT decoding.
//!
//! The backend is the signature verifier; the client reads claims purely
//! to derive display and routing state. Decoding therefore splits the
//! compact form, base64url-decodes the payload segment, and parses the
//! JSON, without touching the signature.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use staffdesk_core::error::{AppError, ErrorKind};
use staffdesk_core::result::AppResult;

use super::claims::Claims;

/// Decodes the claims payload from a compact JWT string.
pub fn decode(token: &str) -> AppResult<Claims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AppError::decode("Token is not a three-segment JWT"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| {
            AppError::with_source(ErrorKind::Decode, "Token payload is not valid base64url", e)
        })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::with_source(ErrorKind::Decode, "Token payload is not valid JSON", e))
}

/// Checks whether a stored token should be treated as expired.
///
/// Fail-closed: a missing token, an undecodable token, and a token
/// without an `exp` claim all count as expired.
pub fn is_token_expired(token: Option<&str>) -> bool {
    match token {
        Some(token) => decode(token)
            .map(|claims| claims.is_expired())
            .unwrap_or(true),
        None => true,
    }
}
