//! # staffdesk-employees
//!
//! Employee directory entity and the typed CRUD client. Requests are
//! sent through the authenticated client from `staffdesk-auth` and so
//! carry its bearer attachment and 401 retry behavior.

pub mod client;
pub mod model;

pub use client::EmployeeClient;
pub use model::{Employee, EmployeeStatus};
