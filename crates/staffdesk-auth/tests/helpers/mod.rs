//! Shared setup for the session integration tests: a mock backend and
//! a fully wired client stack over an in-memory token store.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use wiremock::MockServer;

use staffdesk_auth::session::{AuthClient, AuthenticatedClient, SessionContext};
use staffdesk_auth::token::{Claims, MemoryTokenStore, TokenStore};
use staffdesk_core::config::api::ApiConfig;
use staffdesk_core::config::session::SessionConfig;

/// Mints a signed token carrying the given subject, roles, and lifetime.
///
/// The signature is real but over a throwaway secret; the client never
/// verifies it, only the backend would.
pub fn mint_token(sub: &str, roles: &[&str], lifetime_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Some(sub.to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        iat: Some(now),
        exp: Some(now + lifetime_secs),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-test-secret"),
    )
    .expect("failed to mint test token")
}

/// API configuration pointing at the mock backend.
pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        ..ApiConfig::default()
    }
}

/// A mock backend plus the full client stack wired against it.
pub struct TestSession {
    pub server: MockServer,
    pub context: Arc<SessionContext>,
    pub auth: Arc<AuthClient>,
    pub http: Arc<AuthenticatedClient>,
}

impl TestSession {
    /// Starts with no stored session.
    pub async fn start() -> Self {
        Self::with_store(Arc::new(MemoryTokenStore::new()), SessionConfig::default()).await
    }

    /// Starts with a pre-seeded token pair.
    pub async fn with_tokens(access: &str, refresh: Option<&str>) -> Self {
        let store = MemoryTokenStore::with_tokens(access, refresh.map(str::to_string));
        Self::with_store(Arc::new(store), SessionConfig::default()).await
    }

    /// Starts with explicit store and session configuration.
    pub async fn with_store(store: Arc<dyn TokenStore>, session: SessionConfig) -> Self {
        let server = MockServer::start().await;
        let api = api_config(&server);
        let context = SessionContext::new(store, &session)
            .await
            .expect("failed to build session context");
        let auth = Arc::new(
            AuthClient::new(&api, &session, Arc::clone(&context))
                .expect("failed to build auth client"),
        );
        let http = Arc::new(
            AuthenticatedClient::new(&api, Arc::clone(&auth))
                .expect("failed to build authenticated client"),
        );
        Self {
            server,
            context,
            auth,
            http,
        }
    }
}
