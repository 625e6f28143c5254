//! Employee entity as exchanged with the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use staffdesk_core::AppError;

/// Review status of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Newly added, awaiting review.
    Pending,
    /// Reviewed and confirmed.
    Approved,
    /// Reviewed and declined.
    Rejected,
}

impl EmployeeStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Default for EmployeeStatus {
    /// New records start out pending.
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::input(format!(
                "Invalid employee status: '{s}'. Expected one of: pending, approved, rejected"
            ))),
        }
    }
}

/// An employee record.
///
/// Wire form is camelCase. `id` and `employeeCode` are assigned by the
/// backend and absent on records that have not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Database identifier, absent before the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Position title.
    pub job_title: String,
    /// Contact phone number.
    pub phone: String,
    /// Profile image URL.
    pub image_url: String,
    /// Backend-assigned code, absent before the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    /// Review status.
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    /// Create an unsaved record in the default pending status.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        job_title: impl Into<String>,
        phone: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            job_title: job_title.into(),
            phone: phone.into(),
            image_url: image_url.into(),
            employee_code: None,
            status: EmployeeStatus::default(),
        }
    }

    /// Whether this record has been persisted by the backend.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
