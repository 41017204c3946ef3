//! Structural decoding of bearer-token claims for display.
//!
//! TRUST BOUNDARY
//! ==============
//! Nothing here verifies a signature or enforces expiry. Decoded claims are
//! a display convenience (who am I, when does my token lapse) and must never
//! drive an authorization decision; the server rejects bad tokens with 401.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Username shown when no usable token is present.
pub const ANONYMOUS: &str = "anonymous";

/// Error returned by [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The token is not `header.payload.signature`.
    #[error("token must have 3 dot-separated segments, found {0}")]
    Segments(usize),
    /// The payload segment is not base64url.
    #[error("token payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The payload is not JSON or does not match [`Claims`].
    #[error("token payload does not match the claims schema: {0}")]
    Payload(#[from] serde_json::Error),
    /// The payload names no user.
    #[error("token payload has an empty username")]
    EmptyUsername,
}

/// Token subject. Issuers emit either a numeric user id or a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Id(i64),
    Name(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Typed claims carried in a session token payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Subject,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Issued-at, unix seconds.
    #[serde(default)]
    pub iat: Option<u64>,
    /// Expiry, unix seconds.
    #[serde(default)]
    pub exp: Option<u64>,
}

impl Claims {
    /// Whether `exp` lies at or before `now_secs`. Tokens without `exp`
    /// never report as expired.
    #[must_use]
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.exp.is_some_and(|exp| exp <= now_secs)
    }
}

/// Decode the payload of a `header.payload.signature` token.
///
/// # Errors
///
/// Returns [`DecodeError`] when the token is structurally invalid or its
/// payload does not match [`Claims`].
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Segments(segments.len()));
    }
    // Some issuers keep base64 padding; the URL-safe engine rejects it.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    let claims: Claims = serde_json::from_slice(&bytes)?;
    if claims.username.trim().is_empty() {
        return Err(DecodeError::EmptyUsername);
    }
    Ok(claims)
}

/// What the UI shows about the current user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub username: String,
    pub role: Option<String>,
    pub expires_at: Option<u64>,
}

impl DisplayIdentity {
    #[must_use]
    pub fn anonymous() -> Self {
        Self { username: ANONYMOUS.to_owned(), role: None, expires_at: None }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.username == ANONYMOUS && self.role.is_none() && self.expires_at.is_none()
    }

    /// Whether the token behind this identity has lapsed. Display only.
    #[must_use]
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_secs)
    }
}

impl From<Claims> for DisplayIdentity {
    fn from(claims: Claims) -> Self {
        Self { username: claims.username, role: claims.role, expires_at: claims.exp }
    }
}

/// Current wall-clock time in unix seconds.
#[must_use]
pub fn now_secs() -> u64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    duration.as_secs()
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
