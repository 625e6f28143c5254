//! Bearer-token plumbing with a single refresh-and-retry on 401.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use staffdesk_core::config::api::ApiConfig;
use staffdesk_core::error::{AppError, ErrorKind};
use staffdesk_core::result::AppResult;

use super::client::{AuthClient, read_error_message, transport_error};

/// HTTP client for protected endpoints.
///
/// Every request carries the current access token. A 401 response
/// triggers one refresh and one replay of the original request; a
/// second 401 ends the session.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    http: reqwest::Client,
    base_url: String,
    /// Path suffix of the refresh endpoint, which must never be retried.
    refresh_path: String,
    auth: Arc<AuthClient>,
}

impl AuthenticatedClient {
    /// Creates a client that signs requests against the configured backend.
    pub fn new(api: &ApiConfig, auth: Arc<AuthClient>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            base_url: api.base_url.clone(),
            refresh_path: format!("{}/refresh", api.auth_path),
            auth,
        })
    }

    /// Sends a GET request to `path` under the configured base URL.
    pub async fn get(&self, path: &str) -> AppResult<Response> {
        let request = self.http.get(self.url(path)).build().map_err(build_error)?;
        self.dispatch(request).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> AppResult<Response> {
        let request = self
            .http
            .post(self.url(path))
            .json(body)
            .build()
            .map_err(build_error)?;
        self.dispatch(request).await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> AppResult<Response> {
        let request = self
            .http
            .put(self.url(path))
            .json(body)
            .build()
            .map_err(build_error)?;
        self.dispatch(request).await
    }

    /// Sends a DELETE request to `path`.
    pub async fn delete(&self, path: &str) -> AppResult<Response> {
        let request = self
            .http
            .delete(self.url(path))
            .build()
            .map_err(build_error)?;
        self.dispatch(request).await
    }

    /// Attaches the bearer token, sends, and handles a 401 with a single
    /// refresh-and-replay. Returns only success responses; failures come
    /// back classified.
    async fn dispatch(&self, request: Request) -> AppResult<Response> {
        let path = request.url().path().to_string();
        let context = self.auth.context();
        // Generation first, token second: a rotation that lands after
        // this point is visible to the refresh path below.
        let observed = context.generation();
        let attached = context.bearer_token().await;

        let replay = request.try_clone();
        let response = self.send(request, attached.as_deref()).await?;

        // A 401 from the refresh endpoint itself means the session is
        // gone; there is nothing left to replay with.
        if response.status() != StatusCode::UNAUTHORIZED || path.ends_with(&self.refresh_path) {
            return check_status(response).await;
        }
        let Some(replay) = replay else {
            // Streaming bodies cannot be replayed.
            return check_status(response).await;
        };

        // A concurrent refresh may already have rotated the pair while
        // this request was in flight; prefer that token over spending
        // the refresh token again.
        let replay_token = match context.bearer_token().await {
            Some(current) if attached.as_deref() != Some(current.as_str()) => {
                debug!(path = %path, "Replaying request with a token rotated elsewhere");
                current
            }
            _ => {
                debug!(path = %path, "Access token rejected; refreshing");
                self.auth.refresh_from(observed).await?
            }
        };

        let retried = self.send(replay, Some(&replay_token)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %path, "Backend rejected the refreshed token; signing out");
            context.clear().await?;
            return Err(AppError::session_expired(
                "Session expired; please sign in again",
            ));
        }
        check_status(retried).await
    }

    async fn send(&self, mut request: Request, bearer: Option<&str>) -> AppResult<Response> {
        if let Some(token) = bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Access token is not a valid header", e)
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        let describe = format!("{} {}", request.method(), request.url().path());
        self.http
            .execute(request)
            .await
            .map_err(|e| transport_error(&describe, e))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn build_error(err: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::Internal, "Failed to build request", err)
}

/// Maps a non-success response to a classified error, carrying the
/// backend's message when it sent one.
async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = read_error_message(response).await;
    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::session_expired(
            message.unwrap_or_else(|| "Session expired; please sign in again".to_string()),
        ),
        StatusCode::FORBIDDEN => AppError::access_denied(
            message.unwrap_or_else(|| "You do not have permission for this action".to_string()),
        ),
        StatusCode::NOT_FOUND => {
            AppError::not_found(message.unwrap_or_else(|| "Resource not found".to_string()))
        }
        _ => AppError::api(message.unwrap_or_else(|| format!("Request failed ({status})"))),
    })
}
