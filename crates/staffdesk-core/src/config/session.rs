//! Session persistence and refresh configuration.

use serde::{Deserialize, Serialize};

/// Session persistence and refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token files.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
    /// Seconds of leeway when deciding whether a token is still worth
    /// attaching to a request. A token expiring within the leeway is
    /// treated as already expired.
    #[serde(default = "default_expiry_leeway")]
    pub expiry_leeway_seconds: u64,
    /// Whether a successful registration that returns a token pair also
    /// signs the user in.
    #[serde(default)]
    pub auto_login_after_register: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            expiry_leeway_seconds: default_expiry_leeway(),
            auto_login_after_register: false,
        }
    }
}

fn default_storage_dir() -> String {
    directories::ProjectDirs::from("", "", "staffdesk")
        .map(|dirs| dirs.data_dir().to_string_lossy().into_owned())
        .unwrap_or_else(|| ".staffdesk".to_string())
}

fn default_expiry_leeway() -> u64 {
    5
}
