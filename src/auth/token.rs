//! Bearer token inspection.
//!
//! The client never verifies signatures; it only needs to know whether an
//! access token is still worth sending. Anything that cannot be read is
//! treated as expired.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::Utc;
use serde_json::Value;

/// Returns true if `token` is expired or unreadable.
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now().timestamp())
}

/// Same as [`is_token_expired`] against an explicit clock (seconds since epoch).
///
/// A token is live only if its payload decodes to a JSON object with a
/// numeric `exp` that is not before `now`.
pub fn is_token_expired_at(token: &str, now: i64) -> bool {
    match token_expiry(token) {
        Some(exp) => exp < now as f64,
        None => true,
    }
}

/// Reads the `exp` claim from the payload segment without verifying anything.
pub fn token_expiry(token: &str) -> Option<f64> {
    let payload = token.split('.').nth(1)?;
    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_f64()
}
