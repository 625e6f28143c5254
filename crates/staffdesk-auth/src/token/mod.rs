//! Token pair persistence and payload decoding.

pub mod claims;
pub mod decoder;
pub mod store;

pub use claims::{Claims, ROLE_ADMIN, ROLE_USER};
pub use decoder::{decode, is_token_expired};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
