//! Employee record commands.
//!
//! Each subcommand stands in for a page of the original web client and
//! passes through the route guard before touching the backend.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use staffdesk_core::config::AppConfig;
use staffdesk_core::error::AppError;
use staffdesk_core::result::AppResult;
use staffdesk_employees::{Employee, EmployeeStatus};

use crate::navigator;
use crate::output::{self, OutputFormat};

/// Arguments for employee commands
#[derive(Debug, Args)]
pub struct EmployeeArgs {
    /// Employee subcommand
    #[command(subcommand)]
    pub command: EmployeeCommand,
}

/// Employee subcommands
#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// List employees
    List {
        /// Show only records whose name, email, phone, or job title match
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one employee
    Find {
        /// Record id
        id: i64,
    },
    /// Create an employee record
    Add {
        /// Full name (prompts when omitted)
        #[arg(long)]
        name: Option<String>,
        /// Email (prompts when omitted)
        #[arg(long)]
        email: Option<String>,
        /// Job title (prompts when omitted)
        #[arg(long)]
        job_title: Option<String>,
        /// Phone (prompts when omitted)
        #[arg(long)]
        phone: Option<String>,
        /// Profile image URL
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Edit an existing record; only the given fields change
    Update {
        /// Record id
        id: i64,
        /// New full name
        #[arg(long)]
        name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// New job title
        #[arg(long)]
        job_title: Option<String>,
        /// New phone
        #[arg(long)]
        phone: Option<String>,
        /// New profile image URL
        #[arg(long)]
        image_url: Option<String>,
        /// New approval status
        #[arg(long)]
        status: Option<EmployeeStatus>,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Employee display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EmployeeRow {
    /// Record id
    id: String,
    /// Full name
    name: String,
    /// Email
    email: String,
    /// Job title
    job_title: String,
    /// Phone
    phone: String,
    /// Staff code
    code: String,
    /// Approval status
    status: String,
}

/// Execute employee commands
pub async fn execute(
    args: &EmployeeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let app = super::bootstrap(config).await?;

    match &args.command {
        EmployeeCommand::List { search } => {
            navigator::navigate(&app.guard, &app.routes, "/employees")?;

            let mut employees = app.employees.list().await?;
            if let Some(term) = search {
                let term = term.to_lowercase();
                employees.retain(|e| {
                    [&e.name, &e.email, &e.phone, &e.job_title]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&term))
                });
            }

            let rows: Vec<EmployeeRow> = employees
                .iter()
                .map(|e| EmployeeRow {
                    id: e.id.map(|i| i.to_string()).unwrap_or_default(),
                    name: e.name.clone(),
                    email: e.email.clone(),
                    job_title: e.job_title.clone(),
                    phone: e.phone.clone(),
                    code: e.employee_code.clone().unwrap_or_default(),
                    status: e.status.to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        EmployeeCommand::Find { id } => {
            navigator::navigate(&app.guard, &app.routes, "/employees")?;

            let employee = app.employees.find(*id).await?;
            output::print_item(&employee, format);
        }
        EmployeeCommand::Add {
            name,
            email,
            job_title,
            phone,
            image_url,
        } => {
            navigator::navigate(&app.guard, &app.routes, "/employees/add")?;

            let name = prompt_required(name, "Name")?;
            let email = prompt_required(email, "Email")?;
            let job_title = prompt_required(job_title, "Job title")?;
            let phone = prompt_required(phone, "Phone")?;
            let image_url =
                prompt_optional(image_url, "Image URL (optional, press Enter to skip)")?;

            let draft = Employee::new(name, email, job_title, phone, image_url);
            let saved = app.employees.add(&draft).await?;

            output::print_success(&format!(
                "Employee '{}' created (id: {}, code: {})",
                saved.name,
                saved.id.map(|i| i.to_string()).unwrap_or_else(|| "-".into()),
                saved.employee_code.as_deref().unwrap_or("-")
            ));
        }
        EmployeeCommand::Update {
            id,
            name,
            email,
            job_title,
            phone,
            image_url,
            status,
        } => {
            navigator::navigate(&app.guard, &app.routes, &format!("/employees/edit/{}", id))?;

            // The edit page pre-fills the form from the saved record;
            // unset flags keep the saved values.
            let mut employee = app.employees.find(*id).await?;
            if let Some(name) = name {
                employee.name = name.clone();
            }
            if let Some(email) = email {
                employee.email = email.clone();
            }
            if let Some(job_title) = job_title {
                employee.job_title = job_title.clone();
            }
            if let Some(phone) = phone {
                employee.phone = phone.clone();
            }
            if let Some(image_url) = image_url {
                employee.image_url = image_url.clone();
            }
            if let Some(status) = status {
                employee.status = *status;
            }

            let saved = app.employees.update(&employee).await?;
            output::print_success(&format!("Employee {} updated", saved.id.unwrap_or(*id)));
        }
        EmployeeCommand::Delete { id, yes } => {
            navigator::navigate(&app.guard, &app.routes, "/employees")?;

            if !yes {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete employee {}?", id))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::input(format!("Input error: {}", e)))?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            app.employees.delete(*id).await?;
            output::print_success(&format!("Employee {} deleted", id));
        }
    }

    Ok(())
}

fn prompt_required(value: &Option<String>, prompt: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| AppError::input(format!("Input error: {}", e))),
    }
}

fn prompt_optional(value: &Option<String>, prompt: &str) -> AppResult<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AppError::input(format!("Input error: {}", e))),
    }
}
