//! Executes route guard decisions in the terminal.
//!
//! Each command names the page it stands in for. This module resolves
//! that path against the route table, asks the guard, and renders a
//! denial the way the web client would have rendered a redirect.

use staffdesk_auth::guard::{DenyReason, GuardDecision, RouteGuard, RouteTable};
use staffdesk_core::error::AppError;
use staffdesk_core::result::AppResult;

use crate::output;

/// Resolves a requested path, falling back to the table's landing page
/// when no route matches.
pub fn resolve<'a>(routes: &'a RouteTable, path: &'a str) -> &'a str {
    if routes.resolves(path) {
        path
    } else {
        routes.fallback()
    }
}

/// Gates one navigation.
///
/// Allowed navigations return the effective path. Denied ones print the
/// redirect the guard produced and come back as a typed error, so the
/// process exits non-zero with a hint on how to proceed.
pub fn navigate<'a>(
    guard: &RouteGuard,
    routes: &'a RouteTable,
    path: &'a str,
) -> AppResult<&'a str> {
    let target = resolve(routes, path);
    if target != path {
        output::print_warning(&format!("No page at '{}'; continuing to '{}'", path, target));
    }

    let decision = guard.check_path(routes, target);
    if let Some(redirect) = decision.redirect_target() {
        output::print_warning(&format!("Redirected to {}", redirect));
    }

    match decision {
        GuardDecision::Allow => Ok(target),
        GuardDecision::RedirectToLogin { reason, .. } => Err(match reason {
            DenyReason::SessionExpired => {
                AppError::session_expired("Session expired; run `staffdesk login` to continue")
            }
            DenyReason::LoginRequired => AppError::access_denied(format!(
                "Sign in first: staffdesk login --return-url {}",
                target
            )),
        }),
        GuardDecision::RedirectToUnauthorized {
            required_roles,
            actual_roles,
        } => {
            let actual = if actual_roles.is_empty() {
                "no roles".to_string()
            } else {
                actual_roles.join(", ")
            };
            Err(AppError::access_denied(format!(
                "Requires {}; current session has {}",
                required_roles.join(", "),
                actual
            )))
        }
    }
}
