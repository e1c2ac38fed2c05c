//! Service Layer Module
//!
//! Business logic for the authentication service: the orchestrator, the
//! token codec and store, and email delivery.

pub mod auth;
pub mod email;
pub mod jwt;
pub mod token_store;

// Re-export main service types
pub use auth::AuthService;
pub use email::{ConfirmationMailer, EmailConfig, EmailService};
pub use jwt::JwtCodec;
