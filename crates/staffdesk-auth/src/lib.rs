//! # staffdesk-auth
//!
//! Session and authorization core for the StaffDesk client: token
//! persistence and payload decoding, reactive session state, the
//! login/register/refresh flows, route guarding, and bearer attachment
//! with a single refresh-and-retry on 401.
//!
//! ## Modules
//!
//! - `token` — token pair persistence and payload-only claim decoding
//! - `session` — session state, the owning context, auth flows, HTTP wrapper
//! - `guard` — navigation gating against the live session

pub mod guard;
pub mod session;
pub mod token;

pub use guard::{GuardDecision, RouteGuard, RouteRequirement, RouteTable};
pub use session::{AuthClient, AuthenticatedClient, SessionContext, SessionSnapshot, SessionState};
pub use token::{Claims, FileTokenStore, MemoryTokenStore, TokenStore};
