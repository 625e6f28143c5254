//! CLI command definitions and dispatch.

pub mod employee;
pub mod login;
pub mod logout;
pub mod signup;
pub mod whoami;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use staffdesk_auth::guard::{RouteGuard, RouteTable};
use staffdesk_auth::session::{AuthClient, AuthenticatedClient, SessionContext};
use staffdesk_auth::token::{FileTokenStore, TokenStore};
use staffdesk_core::config::AppConfig;
use staffdesk_core::result::AppResult;
use staffdesk_employees::EmployeeClient;

use crate::output::OutputFormat;

/// StaffDesk — terminal client for the employee management backend
#[derive(Debug, Parser)]
#[command(name = "staffdesk", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file layered over config/default.toml
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(login::LoginArgs),
    /// Create an account
    Signup(signup::SignupArgs),
    /// End the session and discard stored tokens
    Logout,
    /// Show the current session
    Whoami,
    /// Employee records
    Employee(employee::EmployeeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Login(args) => login::execute(args, config, self.format).await,
            Commands::Signup(args) => signup::execute(args, config, self.format).await,
            Commands::Logout => logout::execute(config).await,
            Commands::Whoami => whoami::execute(config, self.format).await,
            Commands::Employee(args) => employee::execute(args, config, self.format).await,
        }
    }
}

/// The wired client stack a command runs against.
pub struct AppContext {
    pub context: Arc<SessionContext>,
    pub auth: Arc<AuthClient>,
    pub employees: EmployeeClient,
    pub guard: RouteGuard,
    pub routes: RouteTable,
}

/// Helper: build the client stack from configuration.
///
/// The session context restores whatever pair the file store holds, so
/// a command started in a fresh process sees the session a previous
/// `login` left behind.
pub async fn bootstrap(config: &AppConfig) -> AppResult<AppContext> {
    let store: Arc<dyn TokenStore> =
        Arc::new(FileTokenStore::open(&config.session.storage_dir).await?);
    let context = SessionContext::new(store, &config.session).await?;
    let auth = Arc::new(AuthClient::new(
        &config.api,
        &config.session,
        Arc::clone(&context),
    )?);
    let http = Arc::new(AuthenticatedClient::new(&config.api, Arc::clone(&auth))?);
    let employees = EmployeeClient::new(&config.api, http);
    let guard = RouteGuard::new(context.state().clone());
    debug!(
        backend = %config.api.base_url,
        storage_dir = %config.session.storage_dir,
        "Client stack ready"
    );

    Ok(AppContext {
        context,
        auth,
        employees,
        guard,
        routes: RouteTable::new(),
    })
}
