//! Database Module
//!
//! Connection pooling and configuration for PostgreSQL.

pub mod connection;

pub use connection::{DatabaseConfig, DatabasePool};
