//! Data Models Module
//!
//! Data structures used throughout the authentication service: user
//! entities, token records and request payloads.

pub mod requests;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use requests::*;
pub use token::{StoredToken, TokenClaims, TokenKind, TokenPair};
pub use user::{Role, User};
