//! Library Auth Service
//!
//! The authentication core of a library-management web application:
//! registration with email confirmation, credential login, signed token
//! issuance, token revocation on logout, and refresh re-authentication.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use library_auth_service::{
//!     api::{AppState, RouterBuilder},
//!     database::DatabaseConfig,
//!     service::{AuthService, EmailConfig, EmailService, JwtCodec},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = DatabaseConfig::from_env()?.create_pool().await?;
//!     let mailer = Arc::new(EmailService::new(EmailConfig::from_env()?)?);
//!     let auth_service = AuthService::new(
//!         pool,
//!         JwtCodec::new("signing_secret".to_string()),
//!         mailer,
//!     );
//!
//!     let app_state = AppState {
//!         auth_service: Arc::new(auth_service),
//!     };
//!
//!     let app = RouterBuilder::with_all_routes()
//!         .build()
//!         .with_state(app_state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: HTTP handlers and configurable route definitions
//! - **Service Layer**: The auth orchestrator, token codec and store, email
//! - **Models**: Data structures and request payloads
//! - **Database**: Connection management and configuration
//! - **Utils**: Security, validation, and error handling
//!
//! # Security
//!
//! - bcrypt password hashing with configurable cost
//! - Signed, time-bound tokens with server-side revocation
//! - Credential failures collapsed into one generic response
//! - Accounts stay disabled until the emailed code is confirmed

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and configuration
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Business logic for the authentication lifecycle
pub mod service;

/// Shared utilities for security, validation, and error handling
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use models::{
    requests::{ConfirmRegisterParams, LoginRequest, RegisterRequest},
    token::{TokenKind, TokenPair},
    user::{Role, User},
};
pub use service::{AuthService, ConfirmationMailer, EmailService, JwtCodec};
pub use utils::error::{AuthError, AuthResult, Violations};

// Re-export database utilities for configuration
pub use database::{DatabaseConfig, DatabasePool};

// Re-export configuration system
pub use config::{env, AppConfig, JwtConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
