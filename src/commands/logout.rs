//! Sign-out command.

use staffdesk_core::config::AppConfig;
use staffdesk_core::result::AppResult;

use crate::output;

/// Execute `logout`. Idempotent: signing out twice is not an error.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let app = super::bootstrap(config).await?;
    app.auth.logout().await?;
    output::print_success("Signed out");
    Ok(())
}
