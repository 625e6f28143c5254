//! Authentication flows — login, register, refresh, logout.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::{debug, info, warn};

use staffdesk_core::config::api::ApiConfig;
use staffdesk_core::config::session::SessionConfig;
use staffdesk_core::error::{AppError, ErrorKind};
use staffdesk_core::result::AppResult;

use super::context::SessionContext;
use super::state::SessionSnapshot;
use super::wire::{AuthResponse, ErrorBody, LoginRequest, RefreshRequest, RegisterRequest};

/// Result of a registration call.
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    /// Username of the new account.
    pub username: String,
    /// Informational message from the backend, if any.
    pub message: Option<String>,
    /// Whether the new account was signed in immediately.
    pub signed_in: bool,
}

/// Issues authentication requests and commits their results into the
/// session context.
#[derive(Debug, Clone)]
pub struct AuthClient {
    /// Plain HTTP client; auth endpoints never get a bearer token.
    http: reqwest::Client,
    /// Base URL plus the auth path prefix.
    auth_base: String,
    /// The shared session context.
    context: Arc<SessionContext>,
    /// Whether register commits a returned token pair like a login.
    auto_login_after_register: bool,
}

impl AuthClient {
    /// Creates a client for the configured backend.
    pub fn new(
        api: &ApiConfig,
        session: &SessionConfig,
        context: Arc<SessionContext>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            auth_base: format!("{}{}", api.base_url, api.auth_path),
            context,
            auto_login_after_register: session.auto_login_after_register,
        })
    }

    /// Returns the session context this client commits into.
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Performs the login flow:
    ///
    /// 1. Mark an attempt, so a concurrent logout supersedes the result
    /// 2. Submit credentials
    /// 3. Classify a non-success response
    /// 4. Commit the returned pair and republish session state
    pub async fn login(&self, username: &str, password: &str) -> AppResult<SessionSnapshot> {
        let attempt = self.context.begin_attempt();

        let response = self
            .http
            .post(self.auth_url("/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| transport_error("Login", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(auth_failure("Login", status, response).await);
        }

        let body: AuthResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Decode, "Malformed authentication response", e)
        })?;
        let Some(token) = body.token else {
            return Err(AppError::api("Login response did not include a token"));
        };

        if !self
            .context
            .commit(&token, body.refresh_token.as_deref(), attempt)
            .await?
        {
            return Err(AppError::session_expired(
                "Session changed while the login was in flight; result discarded",
            ));
        }

        let snapshot = self.context.snapshot();
        info!(username = %username, roles = ?snapshot.roles, "Login successful");
        Ok(snapshot)
    }

    /// Registers a new account.
    ///
    /// Signing the new account in right away is a policy decision: only
    /// done when `auto_login_after_register` is set and the backend
    /// returned a token.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> AppResult<RegisterOutcome> {
        let attempt = self.context.begin_attempt();

        let response = self
            .http
            .post(self.auth_url("/register"))
            .json(&RegisterRequest {
                username: username.to_string(),
                password: password.to_string(),
                role: role.to_string(),
            })
            .send()
            .await
            .map_err(|e| transport_error("Registration", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(auth_failure("Registration", status, response).await);
        }

        let body: AuthResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Decode, "Malformed registration response", e)
        })?;

        let mut signed_in = false;
        if self.auto_login_after_register {
            if let Some(token) = body.token.as_deref() {
                signed_in = self
                    .context
                    .commit(token, body.refresh_token.as_deref(), attempt)
                    .await?;
            }
        }

        info!(username = %username, signed_in, "Registration completed");
        Ok(RegisterOutcome {
            username: body.username.unwrap_or_else(|| username.to_string()),
            message: body.message,
            signed_in,
        })
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Single-flight: concurrent callers queue on the context's refresh
    /// gate, and a waiter that finds the pair already rotated reuses it
    /// instead of spending the refresh token again. Any failure is
    /// terminal and ends the session.
    pub async fn refresh(&self) -> AppResult<String> {
        self.refresh_from(self.context.generation()).await
    }

    /// Refresh relative to the generation the caller last observed.
    ///
    /// `observed` must be read before the caller looked at the token it
    /// now considers stale; any commit since then bumps the generation,
    /// so the rotated token is reused instead of spent again.
    pub(crate) async fn refresh_from(&self, observed: u64) -> AppResult<String> {
        let _gate = self.context.refresh_gate().lock().await;

        if self.context.generation() != observed {
            if let Some(token) = self.context.bearer_token().await {
                debug!("Reusing token rotated by a concurrent refresh");
                return Ok(token);
            }
        }

        let Some(refresh_token) = self.context.refresh_token().await? else {
            self.context.clear().await?;
            return Err(AppError::session_expired("No refresh token available"));
        };

        let attempt = self.context.begin_attempt();
        let (token, rotated) = match self.request_refresh(&refresh_token).await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Token refresh failed; clearing session");
                self.context.clear().await?;
                return Err(AppError::with_source(
                    ErrorKind::SessionExpired,
                    "Session expired; please sign in again",
                    e,
                ));
            }
        };

        // Keep the predecessor when the backend does not rotate it.
        let retained = rotated.or(Some(refresh_token));
        if !self
            .context
            .commit(&token, retained.as_deref(), attempt)
            .await?
        {
            return Err(AppError::session_expired(
                "Session changed while the refresh was in flight; result discarded",
            ));
        }

        info!("Access token refreshed");
        Ok(token)
    }

    /// Clears the session. Idempotent; never fails on an absent session.
    pub async fn logout(&self) -> AppResult<()> {
        self.context.clear().await?;
        info!("Signed out");
        Ok(())
    }

    async fn request_refresh(&self, refresh_token: &str) -> AppResult<(String, Option<String>)> {
        let response = self
            .http
            .post(self.auth_url("/refresh"))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| transport_error("Token refresh", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(auth_failure("Token refresh", status, response).await);
        }

        let body: AuthResponse = response
            .json()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Decode, "Malformed refresh response", e))?;
        let token = body
            .token
            .ok_or_else(|| AppError::api("Refresh response did not include a token"))?;
        Ok((token, body.refresh_token))
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.auth_base, endpoint)
    }
}

/// Classifies a transport-level failure: unreachable backend versus a
/// request that failed in some other way.
pub(crate) fn transport_error(action: &str, err: reqwest::Error) -> AppError {
    if err.is_connect() || err.is_timeout() {
        AppError::with_source(
            ErrorKind::Network,
            format!("{action} failed: backend unreachable"),
            err,
        )
    } else {
        AppError::with_source(ErrorKind::Api, format!("{action} request failed"), err)
    }
}

/// Maps a non-success authentication response to a classified error,
/// carrying the backend's message when it sent one.
pub(crate) async fn auth_failure(action: &str, status: StatusCode, response: Response) -> AppError {
    let message = read_error_message(response).await;
    match status {
        StatusCode::UNAUTHORIZED => AppError::invalid_credentials(
            message.unwrap_or_else(|| "Invalid username or password".to_string()),
        ),
        StatusCode::FORBIDDEN => {
            AppError::access_denied(message.unwrap_or_else(|| "Access denied".to_string()))
        }
        _ => AppError::api(message.unwrap_or_else(|| format!("{action} failed ({status})"))),
    }
}

/// Best-effort extraction of the backend's error message.
pub(crate) async fn read_error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
}
