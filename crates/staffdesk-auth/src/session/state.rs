//! Reactive session state derived from the stored access token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::token::Claims;

/// Immutable snapshot of the session at one point in time.
///
/// All fields describe the same stored token, so consumers never observe
/// a half-updated view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Whether a token was present and unexpired when the snapshot was
    /// derived.
    pub authenticated: bool,
    /// Username from the subject claim.
    pub username: Option<String>,
    /// Role claim strings, in issuance order.
    pub roles: Vec<String>,
    /// Token expiration time, if the claim was present.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// The signed-out snapshot.
    pub fn signed_out() -> Self {
        Self {
            authenticated: false,
            username: None,
            roles: Vec::new(),
            expires_at: None,
        }
    }

    /// Derives a snapshot from decoded claims.
    pub(crate) fn from_claims(claims: &Claims) -> Self {
        Self {
            authenticated: !claims.is_expired(),
            username: claims.username().map(str::to_string),
            roles: claims.roles.clone(),
            expires_at: claims.expires_at(),
        }
    }

    /// Whether the session is authenticated right now.
    ///
    /// Re-checks expiry against the current time, so a snapshot derived
    /// while the token was still valid turns false the moment it expires,
    /// without waiting for a mutation.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.expires_at.is_some_and(|at| Utc::now() < at)
    }

    /// Whether the session holds the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Whether the session holds at least one of the given roles.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }
}

/// Publishes session snapshots to any number of observers.
///
/// Backed by a watch channel: every publication replaces the whole
/// snapshot, so observers see all fields change together. Cloning
/// yields another handle onto the same channel.
#[derive(Debug, Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionState {
    /// Creates state in the signed-out position.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::signed_out());
        Self { tx: Arc::new(tx) }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Whether the current session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Replaces the current snapshot.
    pub(crate) fn publish(&self, snapshot: SessionSnapshot) {
        self.tx.send_replace(snapshot);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::token::{ROLE_ADMIN, ROLE_USER};

    #[test]
    fn snapshot_preserves_claim_role_order() {
        let claims = Claims {
            sub: Some("alice".to_string()),
            roles: vec![ROLE_ADMIN.to_string(), ROLE_USER.to_string()],
            iat: None,
            exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
        };
        let snapshot = SessionSnapshot::from_claims(&claims);
        assert_eq!(snapshot.roles, vec![ROLE_ADMIN, ROLE_USER]);
        assert!(snapshot.is_authenticated());
    }

    #[test]
    fn snapshot_goes_stale_when_the_token_expires() {
        let snapshot = SessionSnapshot {
            authenticated: true,
            username: Some("alice".to_string()),
            roles: vec![ROLE_USER.to_string()],
            expires_at: Some(Utc::now() - Duration::seconds(1)),
        };
        assert!(!snapshot.is_authenticated());
    }

    #[test]
    fn role_queries_match_exact_strings() {
        let snapshot = SessionSnapshot {
            authenticated: true,
            username: None,
            roles: vec![ROLE_USER.to_string()],
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        assert!(snapshot.has_role(ROLE_USER));
        assert!(!snapshot.has_role(ROLE_ADMIN));
        assert!(snapshot.has_any_role(&[ROLE_ADMIN, ROLE_USER]));
        assert!(!snapshot.has_any_role(&[ROLE_ADMIN]));
        assert!(!snapshot.has_any_role::<&str>(&[]));
    }

    #[test]
    fn state_publication_replaces_the_whole_snapshot() {
        let state = SessionState::new();
        let mut rx = state.subscribe();
        assert!(!rx.borrow().authenticated);

        state.publish(SessionSnapshot {
            authenticated: true,
            username: Some("alice".to_string()),
            roles: vec![ROLE_ADMIN.to_string()],
            expires_at: Some(Utc::now() + Duration::hours(1)),
        });

        let seen = rx.borrow_and_update().clone();
        assert!(seen.authenticated);
        assert_eq!(seen.username.as_deref(), Some("alice"));
        assert_eq!(seen.roles, vec![ROLE_ADMIN]);
    }
}
