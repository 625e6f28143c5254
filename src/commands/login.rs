//! Sign-in command.

use clap::Args;

use staffdesk_core::config::AppConfig;
use staffdesk_core::error::AppError;
use staffdesk_core::result::AppResult;

use crate::navigator;
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompts when omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password (prompts when omitted)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Page to continue to after signing in, as printed by a redirect
    #[arg(long)]
    pub return_url: Option<String>,
}

/// Execute `login`
pub async fn execute(args: &LoginArgs, config: &AppConfig, _format: OutputFormat) -> AppResult<()> {
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
            .interact()
            .map_err(|e| AppError::input(format!("Input error: {}", e)))?,
    };

    let snapshot = app.auth.login(&username, &password).await?;
    output::print_success(&format!(
        "Signed in as {} [{}]",
        snapshot.username.as_deref().unwrap_or(&username),
        snapshot.roles.join(", ")
    ));

    // A login prompted by a guard denial resumes the page the user was
    // after, subject to the same guard under the new session.
    if let Some(return_url) = &args.return_url {
        let target = navigator::navigate(&app.guard, &app.routes, return_url)?;
        println!("Continue at {}", target);
    }

    Ok(())
}
