//! Session display command.

use serde::Serialize;

use staffdesk_core::config::AppConfig;
use staffdesk_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Session display for table/JSON output
#[derive(Debug, Serialize)]
struct SessionView {
    /// Whether the session is currently usable
    authenticated: bool,
    /// Username
    username: Option<String>,
    /// Granted roles
    roles: Vec<String>,
    /// Access token expiry
    expires_at: Option<String>,
}

/// Execute `whoami`. A signed-out session is a valid answer, not an error.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let app = super::bootstrap(config).await?;
    let snapshot = app.context.snapshot();

    let view = SessionView {
        authenticated: snapshot.is_authenticated(),
        username: snapshot.username.clone(),
        roles: snapshot.roles.clone(),
        expires_at: snapshot
            .expires_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
    };

    match format {
        OutputFormat::Json => output::print_item(&view, format),
        OutputFormat::Table => {
            if view.authenticated {
                output::print_kv("Username", view.username.as_deref().unwrap_or("-"));
                output::print_kv("Roles", &view.roles.join(", "));
                output::print_kv("Expires", view.expires_at.as_deref().unwrap_or("-"));
            } else if view.expires_at.is_some() {
                println!("Session expired; run `staffdesk login`.");
            } else {
                println!("Not signed in.");
            }
        }
    }

    Ok(())
}
