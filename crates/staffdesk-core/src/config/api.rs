//! Backend API configuration.

use serde::{Deserialize, Serialize};

/// Backend API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of the authentication endpoints.
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    /// Path prefix of the employee endpoints.
    #[serde(default = "default_employee_path")]
    pub employee_path: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_path: default_auth_path(),
            employee_path: default_employee_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_auth_path() -> String {
    "/api/auth".to_string()
}

fn default_employee_path() -> String {
    "/employee".to_string()
}

fn default_timeout() -> u64 {
    30
}
