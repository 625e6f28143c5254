//! Guard evaluation — allows or denies navigation against the live session.

use urlencoding::encode;

use crate::session::{SessionSnapshot, SessionState};

use super::routes::{RouteRequirement, RouteTable};

/// Why a navigation was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// There is no session to check.
    LoginRequired,
    /// There was a session, but it is no longer valid.
    SessionExpired,
}

impl DenyReason {
    /// Short code carried to the login view through the redirect URL.
    pub fn as_code(&self) -> &'static str {
        match self {
            DenyReason::LoginRequired => "login-required",
            DenyReason::SessionExpired => "session-expired",
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation may proceed.
    Allow,
    /// A sign-in is needed first; `return_url` brings the user back
    /// afterwards.
    RedirectToLogin {
        return_url: String,
        reason: DenyReason,
    },
    /// Signed in, but without any of the roles the route asks for.
    RedirectToUnauthorized {
        required_roles: Vec<String>,
        actual_roles: Vec<String>,
    },
}

impl GuardDecision {
    /// Whether the navigation was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Redirect URL for a denial, with the denial context carried in
    /// the query string for the destination view to render.
    pub fn redirect_target(&self) -> Option<String> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin { return_url, reason } => Some(format!(
                "/login?returnUrl={}&reason={}",
                encode(return_url),
                reason.as_code()
            )),
            GuardDecision::RedirectToUnauthorized {
                required_roles,
                actual_roles,
            } => Some(format!(
                "/unauthorized?required={}&actual={}",
                encode(&required_roles.join(",")),
                encode(&actual_roles.join(","))
            )),
        }
    }
}

/// Gates navigation against the current session snapshot.
///
/// Checks are synchronous and never touch the network; they read
/// whatever [`SessionState`] holds at the moment of the call.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    state: SessionState,
}

impl RouteGuard {
    /// Creates a guard over the given session state.
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    /// Evaluates a single requirement for a navigation to `target`.
    pub fn check(&self, requirement: &RouteRequirement, target: &str) -> GuardDecision {
        decide(&self.state.snapshot(), requirement, target)
    }

    /// Resolves `path` in the table and evaluates its effective
    /// requirement. Paths the table does not know are held to the
    /// default requirement, so they still need a session.
    pub fn check_path(&self, table: &RouteTable, path: &str) -> GuardDecision {
        let requirement = table.requirement_for(path).unwrap_or_default();
        self.check(&requirement, path)
    }
}

fn decide(
    snapshot: &SessionSnapshot,
    requirement: &RouteRequirement,
    target: &str,
) -> GuardDecision {
    if !requirement.requires_authentication {
        return GuardDecision::Allow;
    }
    if !snapshot.is_authenticated() {
        // An expiry on record means a session existed and lapsed.
        let reason = if snapshot.expires_at.is_some() {
            DenyReason::SessionExpired
        } else {
            DenyReason::LoginRequired
        };
        return GuardDecision::RedirectToLogin {
            return_url: target.to_string(),
            reason,
        };
    }
    if !requirement.required_roles.is_empty()
        && !snapshot.has_any_role(&requirement.required_roles)
    {
        return GuardDecision::RedirectToUnauthorized {
            required_roles: requirement.required_roles.clone(),
            actual_roles: snapshot.roles.clone(),
        };
    }
    GuardDecision::Allow
}
