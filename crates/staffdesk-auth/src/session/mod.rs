//! Session lifecycle: reactive state, the owning context, the
//! authentication flows that mutate it, and the authenticated HTTP
//! client built on top.

pub mod authenticator;
pub mod client;
pub mod context;
pub mod state;
pub mod wire;

pub use authenticator::AuthenticatedClient;
pub use client::{AuthClient, RegisterOutcome};
pub use context::SessionContext;
pub use state::{SessionSnapshot, SessionState};
