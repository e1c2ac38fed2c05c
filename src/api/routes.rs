//! API Route Definitions
//!
//! HTTP routes for the authentication service, assembled through a builder
//! so deployments can expose only the endpoints they need. A confirmation
//! worker, for example, can serve the confirm endpoint without exposing
//! login.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::*;

/// Builder for creating API routes with configurable endpoints
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable the registration endpoint (POST /auth/register)
    register: bool,
    /// Whether to enable the login endpoint (POST /auth/login)
    login: bool,
    /// Whether to enable the token refresh endpoint (POST /auth/refresh-token)
    refresh_token: bool,
    /// Whether to enable the logout endpoint (POST /auth/logout)
    logout: bool,
    /// Whether to enable the confirmation endpoint (GET /auth/confirm)
    confirm_register: bool,
}

impl RouterBuilder {
    /// Creates a new router builder with all routes disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every endpoint enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            register: true,
            login: true,
            refresh_token: true,
            logout: true,
            confirm_register: true,
        }
    }

    /// Creates a router builder with only the health check enabled
    ///
    /// Useful as a base configuration when endpoints are added one by one.
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            ..Self::default()
        }
    }

    /// Enables or disables the health check endpoint (GET /health)
    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    /// Enables or disables the registration endpoint (POST /auth/register)
    pub fn register(mut self, enabled: bool) -> Self {
        self.register = enabled;
        self
    }

    /// Enables or disables the login endpoint (POST /auth/login)
    pub fn login(mut self, enabled: bool) -> Self {
        self.login = enabled;
        self
    }

    /// Enables or disables the token refresh endpoint (POST /auth/refresh-token)
    pub fn refresh_token(mut self, enabled: bool) -> Self {
        self.refresh_token = enabled;
        self
    }

    /// Enables or disables the logout endpoint (POST /auth/logout)
    pub fn logout(mut self, enabled: bool) -> Self {
        self.logout = enabled;
        self
    }

    /// Enables or disables the confirmation endpoint (GET /auth/confirm)
    pub fn confirm_register(mut self, enabled: bool) -> Self {
        self.confirm_register = enabled;
        self
    }

    /// Builds the Axum router with the configured routes
    pub fn build(self) -> Router<AppState> {
        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(health_check));
        }

        if self.register {
            router = router.route("/auth/register", post(register));
        }

        if self.login {
            router = router.route("/auth/login", post(login));
        }

        if self.refresh_token {
            router = router.route("/auth/refresh-token", post(refresh_token));
        }

        if self.logout {
            router = router.route("/auth/logout", post(logout));
        }

        if self.confirm_register {
            router = router.route("/auth/confirm", get(confirm_register));
        }

        router
    }
}

/// Creates the full set of API routes
pub fn create_routes() -> Router<AppState> {
    RouterBuilder::with_all_routes().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builder_default() {
        let builder = RouterBuilder::new();

        assert!(!builder.health_check);
        assert!(!builder.register);
        assert!(!builder.login);
        assert!(!builder.refresh_token);
        assert!(!builder.logout);
        assert!(!builder.confirm_register);
    }

    #[test]
    fn test_router_builder_with_all_routes() {
        let builder = RouterBuilder::with_all_routes();

        assert!(builder.health_check);
        assert!(builder.register);
        assert!(builder.login);
        assert!(builder.refresh_token);
        assert!(builder.logout);
        assert!(builder.confirm_register);
    }

    #[test]
    fn test_router_builder_with_minimal_routes() {
        let builder = RouterBuilder::with_minimal_routes();

        assert!(builder.health_check);
        assert!(!builder.register);
        assert!(!builder.login);
    }

    #[test]
    fn test_router_builder_fluent_toggles() {
        let builder = RouterBuilder::new()
            .health_check(true)
            .login(true)
            .confirm_register(true);

        assert!(builder.health_check);
        assert!(builder.login);
        assert!(builder.confirm_register);
        assert!(!builder.register);
        assert!(!builder.refresh_token);
        assert!(!builder.logout);
    }
}
