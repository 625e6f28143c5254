//! Account creation command.

use clap::Args;

use staffdesk_core::config::AppConfig;
use staffdesk_core::error::AppError;
use staffdesk_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for `signup`
#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Username (prompts when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (prompts when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Requested role
    #[arg(long, default_value = "USER")]
    pub role: String,
}

/// Execute `signup`
pub async fn execute(
    args: &SignupArgs,
    config: &AppConfig,
    _format: OutputFormat,
) -> AppResult<()> {
    let role = args.role.to_uppercase();
    if !matches!(role.as_str(), "USER" | "ADMIN") {
        return Err(AppError::input(format!(
            "Unknown role '{}'; expected USER or ADMIN",
            args.role
        )));
    }

    let app = super::bootstrap(config).await?;

    let username = match &args.username {
        Some(u) => u.clone(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::input(format!("Input error: {}", e)))?,
    };

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::input(format!("Input error: {}", e)))?,
    };

    let outcome = app.auth.register(&username, &password, &role).await?;

    if outcome.signed_in {
        output::print_success(&format!(
            "Account '{}' created and signed in",
            outcome.username
        ));
    } else {
        output::print_success(&format!(
            "Account '{}' created; sign in with `staffdesk login`",
            outcome.username
        ));
    }
    if let Some(message) = &outcome.message {
        println!("{}", message);
    }

    Ok(())
}
