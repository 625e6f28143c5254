//! Request and response shapes of the authentication backend.

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Desired password.
    pub password: String,
    /// Requested role name (without the `ROLE_` prefix).
    pub role: String,
}

/// Body of `POST /refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

/// Response shape shared by login, register, and refresh.
///
/// The backend omits fields freely depending on the flow, so everything
/// is optional and validated by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    /// Newly minted access token.
    pub token: Option<String>,
    /// Newly minted refresh token, when rotated or first issued.
    pub refresh_token: Option<String>,
    /// Username echoed back.
    pub username: Option<String>,
    /// Role names echoed back.
    pub roles: Option<Vec<String>>,
    /// Access token lifetime in seconds.
    pub expires_in: Option<u64>,
    /// Informational message.
    pub message: Option<String>,
}

/// Error body shape; the backend uses `message` or `error` depending on
/// the endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    /// The human-readable message, whichever key carried it.
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_decodes_camel_case_fields() {
        let body: AuthResponse = serde_json::from_str(
            r#"{"token":"t1","refreshToken":"r1","username":"alice","roles":["ROLE_USER"]}"#,
        )
        .unwrap();
        assert_eq!(body.token.as_deref(), Some("t1"));
        assert_eq!(body.refresh_token.as_deref(), Some("r1"));
        assert_eq!(body.roles, Some(vec!["ROLE_USER".to_string()]));
        assert_eq!(body.expires_in, None);
    }

    #[test]
    fn refresh_request_serializes_camel_case() {
        let body = serde_json::to_string(&RefreshRequest {
            refresh_token: "r1".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"refreshToken":"r1"}"#);
    }

    #[test]
    fn error_body_prefers_message_over_error() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"bad credentials","error":"ignored"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad credentials"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"username taken"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("username taken"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.into_message(), None);
    }
}
