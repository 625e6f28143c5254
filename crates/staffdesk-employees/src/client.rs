//! Typed client for the employee endpoints.

use std::sync::Arc;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use staffdesk_auth::AuthenticatedClient;
use staffdesk_core::config::api::ApiConfig;
use staffdesk_core::error::{AppError, ErrorKind};
use staffdesk_core::result::AppResult;

use crate::model::Employee;

/// Employee CRUD calls.
///
/// Every request goes through the [`AuthenticatedClient`], so it carries
/// the current bearer token and the refresh-and-retry handling for 401s.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    http: Arc<AuthenticatedClient>,
    /// Path prefix of the employee endpoints.
    path: String,
}

impl EmployeeClient {
    /// Creates a client for the configured employee endpoints.
    pub fn new(api: &ApiConfig, http: Arc<AuthenticatedClient>) -> Self {
        Self {
            http,
            path: api.employee_path.clone(),
        }
    }

    /// Fetches every employee record.
    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        let response = self.http.get(&format!("{}/all", self.path)).await?;
        let employees: Vec<Employee> = read_json(response, "employee list").await?;
        debug!(count = employees.len(), "Fetched employee list");
        Ok(employees)
    }

    /// Fetches a single employee by id.
    pub async fn find(&self, id: i64) -> AppResult<Employee> {
        let response = self.http.get(&format!("{}/find/{id}", self.path)).await?;
        read_json(response, "employee").await
    }

    /// Creates a record. The backend assigns `id` and `employeeCode` and
    /// returns the saved form.
    pub async fn add(&self, employee: &Employee) -> AppResult<Employee> {
        let response = self
            .http
            .post_json(&format!("{}/add", self.path), employee)
            .await?;
        let saved: Employee = read_json(response, "created employee").await?;
        debug!(id = ?saved.id, name = %saved.name, "Employee created");
        Ok(saved)
    }

    /// Updates an existing record in place. The record must have been
    /// saved before.
    pub async fn update(&self, employee: &Employee) -> AppResult<Employee> {
        if !employee.is_saved() {
            return Err(AppError::input("Employee has no id; add it first"));
        }
        let response = self
            .http
            .put_json(&format!("{}/update", self.path), employee)
            .await?;
        let saved: Employee = read_json(response, "updated employee").await?;
        debug!(id = ?saved.id, "Employee updated");
        Ok(saved)
    }

    /// Deletes a record by id.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.http
            .delete(&format!("{}/delete/{id}", self.path))
            .await?;
        debug!(id, "Employee deleted");
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
    response.json().await.map_err(|e| {
        AppError::with_source(ErrorKind::Decode, format!("Malformed {what} response"), e)
    })
}
