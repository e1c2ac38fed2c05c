//! Configuration Module
//!
//! Centralized configuration management for the authentication service:
//! server, database, token signing and email settings, all sourced from
//! environment variables.

use crate::database::DatabaseConfig;
use crate::service::EmailConfig;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as boolean with default
    pub fn get_bool(key: &str, default: bool) -> bool {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Email configuration, absent when no SMTP relay is configured
    pub email: Option<EmailConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub request_timeout_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared signing secret for access and refresh tokens
    pub secret: String,
    pub access_token_expires_hours: i64,
    pub refresh_token_expires_days: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::get_string("SERVER_HOST", "0.0.0.0"),
            port: env::get_u16("SERVER_PORT", 3000),
            log_level: env::get_string("LOG_LEVEL", "info"),
            cors_origins: env::get_string("CORS_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            request_timeout_seconds: env::get_u64("REQUEST_TIMEOUT_SECONDS", 30),
        }
    }
}

impl JwtConfig {
    /// Load JWT configuration from environment
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        Ok(Self {
            secret,
            access_token_expires_hours: env::get_i64("JWT_ACCESS_EXPIRES_HOURS", 1),
            refresh_token_expires_days: env::get_i64("JWT_REFRESH_EXPIRES_DAYS", 30),
        })
    }
}

impl AppConfig {
    /// Load complete application configuration from environment
    pub fn from_env() -> anyhow::Result<Self> {
        let email = if env::is_set("SMTP_HOST") {
            Some(EmailConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::from_env()
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            jwt: JwtConfig::from_env()?,
            email,
        })
    }

    /// Validate the complete configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!("Database min_connections cannot be greater than max_connections");
        }

        if self.jwt.secret.is_empty() {
            anyhow::bail!("JWT secret cannot be empty");
        }

        if self.jwt.access_token_expires_hours <= 0 {
            anyhow::bail!("JWT access token expiry must be positive");
        }

        if self.jwt.refresh_token_expires_days <= 0 {
            anyhow::bail!("JWT refresh token expiry must be positive");
        }

        Ok(())
    }
}
