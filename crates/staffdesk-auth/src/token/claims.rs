//! Access token claims as issued by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role claim string for regular users.
pub const ROLE_USER: &str = "ROLE_USER";
/// Role claim string for administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// JWT claims payload carried in every access token.
///
/// Every field is optional on the wire: the client derives state from
/// whatever the backend put in the token and fails closed on anything
/// missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Role claim strings, in issuance order.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Returns the username from the subject claim.
    pub fn username(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Returns the expiration as a `DateTime<Utc>`, if the claim is present.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Checks whether this token has expired as of `now`.
    ///
    /// A missing or unreadable `exp` claim counts as expired (fail-closed).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks whether the roles claim contains the given role string.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
