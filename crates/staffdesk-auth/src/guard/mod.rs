//! Navigation guarding.
//!
//! [`RouteTable`] describes the navigable surface and what each route
//! requires; [`RouteGuard`] evaluates a navigation attempt against the
//! live session and answers with a [`GuardDecision`].

pub mod enforcer;
pub mod routes;

pub use enforcer::{DenyReason, GuardDecision, RouteGuard};
pub use routes::{RouteDef, RouteRequirement, RouteTable};
