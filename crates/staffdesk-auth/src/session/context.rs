//! Session context — owns the token store and the published state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use staffdesk_core::config::session::SessionConfig;
use staffdesk_core::result::AppResult;

use crate::token::decoder;
use crate::token::store::TokenStore;

use super::state::{SessionSnapshot, SessionState};

/// Owns the persisted token pair and the session state derived from it.
///
/// Every mutation runs under one lock: write the store, re-read it,
/// decode, publish a fresh snapshot. The published state therefore
/// always agrees with what is persisted. A generation counter orders
/// attempts so a login or refresh that resolves after a logout cannot
/// resurrect the session it started under.
///
/// One context instance is shared by the auth client, the route guard,
/// and the request authenticator.
pub struct SessionContext {
    /// Token pair persistence.
    store: Arc<dyn TokenStore>,
    /// Published snapshot, replaced on every mutation.
    state: SessionState,
    /// Bumped when an attempt begins and when a mutation lands.
    generation: AtomicU64,
    /// Serializes store mutation and state recomputation.
    mutation: Mutex<()>,
    /// Held by the single in-flight refresh attempt.
    refresh_gate: Mutex<()>,
    /// Seconds before nominal expiry at which a token stops being
    /// attached to outgoing requests.
    expiry_leeway_seconds: u64,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("snapshot", &self.state.snapshot())
            .finish()
    }
}

impl SessionContext {
    /// Creates a context over the given store and restores any persisted
    /// session into the published state.
    pub async fn new(store: Arc<dyn TokenStore>, config: &SessionConfig) -> AppResult<Arc<Self>> {
        let context = Arc::new(Self {
            store,
            state: SessionState::new(),
            generation: AtomicU64::new(0),
            mutation: Mutex::new(()),
            refresh_gate: Mutex::new(()),
            expiry_leeway_seconds: config.expiry_leeway_seconds,
        });
        {
            let _guard = context.mutation.lock().await;
            context.recompute().await?;
        }
        Ok(context)
    }

    /// Returns the published session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    /// Returns the current generation.
    ///
    /// Changes whenever an attempt begins or a mutation lands; useful for
    /// detecting that somebody else touched the session in the meantime.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Marks the start of a login/register/refresh attempt.
    ///
    /// The returned attempt id stays valid for exactly one [`commit`]
    /// and only while no other attempt begins and no other mutation
    /// lands first; a superseded attempt's commit is discarded.
    ///
    /// [`commit`]: Self::commit
    pub fn begin_attempt(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the stored access token, if any.
    pub async fn access_token(&self) -> AppResult<Option<String>> {
        self.store.access_token().await
    }

    /// Returns the stored refresh token, if any.
    pub async fn refresh_token(&self) -> AppResult<Option<String>> {
        self.store.refresh_token().await
    }

    /// Returns the access token to attach to an outgoing request.
    ///
    /// A token expiring within the configured leeway is withheld so a
    /// request is not sent with a token that dies in flight. Storage
    /// read failures degrade to an unauthenticated request.
    pub async fn bearer_token(&self) -> Option<String> {
        let token = match self.store.access_token().await {
            Ok(token) => token?,
            Err(e) => {
                warn!(error = %e, "Failed to read access token; proceeding unauthenticated");
                return None;
            }
        };
        let horizon = Utc::now() + Duration::seconds(self.expiry_leeway_seconds as i64);
        match decoder::decode(&token) {
            Ok(claims) if !claims.is_expired_at(horizon) => Some(token),
            _ => None,
        }
    }

    /// The refresh single-flight gate.
    ///
    /// Holding this lock marks a refresh in progress; concurrent callers
    /// queue here and re-check the generation once they acquire it.
    pub(crate) fn refresh_gate(&self) -> &Mutex<()> {
        &self.refresh_gate
    }

    /// Persists a new token pair and republishes the derived state.
    ///
    /// Returns `false` without touching anything when the attempt was
    /// superseded: another attempt began, or another mutation landed,
    /// after `attempt` was issued. The late result is discarded.
    pub async fn commit(
        &self,
        access: &str,
        refresh: Option<&str>,
        attempt: u64,
    ) -> AppResult<bool> {
        let _guard = self.mutation.lock().await;
        if self.generation.load(Ordering::SeqCst) != attempt {
            debug!(attempt, "Discarding token commit from a superseded attempt");
            return Ok(false);
        }
        self.store.store(access, refresh).await?;
        self.recompute().await?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    /// Removes the stored pair and publishes the signed-out state.
    ///
    /// Idempotent. Also supersedes any in-flight attempt, so a login or
    /// refresh resolving after this call is discarded.
    pub async fn clear(&self) -> AppResult<()> {
        let _guard = self.mutation.lock().await;
        self.store.clear().await?;
        self.state.publish(SessionSnapshot::signed_out());
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Re-derives the published snapshot from the stored access token.
    ///
    /// Caller must hold the mutation lock. An undecodable token clears
    /// the store as well, so state and persistence stay in agreement.
    async fn recompute(&self) -> AppResult<()> {
        let snapshot = match self.store.access_token().await? {
            None => SessionSnapshot::signed_out(),
            Some(token) => match decoder::decode(&token) {
                Ok(claims) => SessionSnapshot::from_claims(&claims),
                Err(e) => {
                    warn!(error = %e, "Stored token is undecodable; clearing session");
                    self.store.clear().await?;
                    SessionSnapshot::signed_out()
                }
            },
        };
        self.state.publish(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use crate::token::store::MemoryTokenStore;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.sig")
    }

    fn valid_token(username: &str, roles: &[&str]) -> String {
        token_with_payload(&serde_json::json!({
            "sub": username,
            "roles": roles,
            "exp": Utc::now().timestamp() + 3600,
        }))
    }

    async fn context_over(store: MemoryTokenStore) -> Arc<SessionContext> {
        SessionContext::new(Arc::new(store), &SessionConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn restores_a_persisted_session_on_startup() {
        let store = MemoryTokenStore::with_tokens(valid_token("alice", &["ROLE_ADMIN"]), None);
        let context = context_over(store).await;

        let snapshot = context.snapshot();
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.username.as_deref(), Some("alice"));
        assert_eq!(snapshot.roles, vec!["ROLE_ADMIN"]);
    }

    #[tokio::test]
    async fn undecodable_persisted_token_clears_store_and_state() {
        let store = MemoryTokenStore::with_tokens("garbage", Some("refresh-1".to_string()));
        let context = context_over(store).await;

        assert!(!context.snapshot().is_authenticated());
        assert_eq!(context.access_token().await.unwrap(), None);
        assert_eq!(context.refresh_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn commit_publishes_state_matching_the_stored_token() {
        let context = context_over(MemoryTokenStore::new()).await;
        let mut rx = context.state().subscribe();

        let attempt = context.begin_attempt();
        let committed = context
            .commit(&valid_token("bob", &["ROLE_USER"]), Some("refresh-1"), attempt)
            .await
            .unwrap();
        assert!(committed);

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert!(seen.authenticated);
        assert_eq!(seen.username.as_deref(), Some("bob"));
        assert_eq!(seen.roles, vec!["ROLE_USER"]);
        assert_eq!(
            context.refresh_token().await.unwrap(),
            Some("refresh-1".to_string())
        );
    }

    #[tokio::test]
    async fn clear_supersedes_an_in_flight_attempt() {
        let context = context_over(MemoryTokenStore::new()).await;

        let attempt = context.begin_attempt();
        context.clear().await.unwrap();

        let committed = context
            .commit(&valid_token("alice", &["ROLE_USER"]), None, attempt)
            .await
            .unwrap();
        assert!(!committed);
        assert!(!context.snapshot().is_authenticated());
        assert_eq!(context.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn a_newer_attempt_supersedes_an_older_one() {
        let context = context_over(MemoryTokenStore::new()).await;

        let first = context.begin_attempt();
        let second = context.begin_attempt();

        let committed = context
            .commit(&valid_token("old", &[]), None, first)
            .await
            .unwrap();
        assert!(!committed);

        let committed = context
            .commit(&valid_token("new", &["ROLE_USER"]), None, second)
            .await
            .unwrap();
        assert!(committed);
        assert_eq!(context.snapshot().username.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn bearer_token_withholds_expiring_tokens() {
        let fresh = valid_token("alice", &[]);
        let store = MemoryTokenStore::with_tokens(fresh.clone(), None);
        let context = context_over(store).await;
        assert_eq!(context.bearer_token().await, Some(fresh));

        let dying = token_with_payload(&serde_json::json!({
            "sub": "alice",
            "exp": Utc::now().timestamp() + 2,
        }));
        let attempt = context.begin_attempt();
        context.commit(&dying, None, attempt).await.unwrap();
        // Expires inside the default five-second leeway.
        assert_eq!(context.bearer_token().await, None);
    }
}
