//! Authentication Service Development Server
//!
//! Development server exposing every authentication endpoint. Production
//! deployments that need a narrower surface should assemble their own
//! router with `RouterBuilder`.

use std::sync::Arc;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use library_auth_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    service::{AuthService, EmailService, JwtCodec},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!(
        "Starting library auth service v{}",
        library_auth_service::VERSION
    );

    // Load configuration from environment
    let config = AppConfig::from_env()?;
    config.validate()?;

    let database_pool = config.database.create_pool().await?;

    // Run database migrations
    log::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&database_pool).await?;

    // Registration cannot complete without a confirmation email, so a
    // missing relay is a startup error rather than a runtime surprise.
    let email_config = config
        .email
        .clone()
        .ok_or_else(|| anyhow::anyhow!("SMTP configuration is required (set SMTP_HOST)"))?;
    let mailer = Arc::new(EmailService::new(email_config)?);

    let codec = JwtCodec::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::hours(config.jwt.access_token_expires_hours),
        chrono::Duration::days(config.jwt.refresh_token_expires_days),
    );

    let auth_service = AuthService::new(database_pool, codec, mailer);

    let app_state = AppState {
        auth_service: Arc::new(auth_service),
    };

    let app = RouterBuilder::with_all_routes()
        .build()
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any) // Permissive CORS for development
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .into_inner(),
        );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
