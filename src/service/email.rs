//! Email Service
//!
//! Sends the registration confirmation email over SMTP. The orchestrator
//! talks to the [`ConfirmationMailer`] trait so delivery can be swapped out
//! in tests; the SMTP implementation mirrors the deployment's relay setup.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::{debug, error, info, warn};
use tera::{Context, Tera};

use crate::utils::error::{AuthError, AuthResult};

/// Delivery contract consumed by registration
///
/// `Ok(false)` and `Err(_)` are both treated as delivery failure by the
/// caller; the distinction only matters for logging.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send_confirmation(
        &self,
        to: &str,
        first_name: &str,
        last_name: &str,
        code: &str,
    ) -> AuthResult<bool>;
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: String,
    /// From email address
    pub from_email: String,
    /// From name (display name)
    pub from_name: String,
    /// Base URL used to build the confirmation link
    pub app_base_url: String,
    /// Upper bound on one SMTP send; a timeout counts as delivery failure
    pub send_timeout: Duration,
}

impl EmailConfig {
    /// Create email configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .unwrap_or(587),
            smtp_username: std::env::var("SMTP_USERNAME")
                .map_err(|_| anyhow::anyhow!("SMTP_USERNAME environment variable is required"))?,
            smtp_password: std::env::var("SMTP_PASSWORD")
                .map_err(|_| anyhow::anyhow!("SMTP_PASSWORD environment variable is required"))?,
            from_email: std::env::var("FROM_EMAIL")
                .map_err(|_| anyhow::anyhow!("FROM_EMAIL environment variable is required"))?,
            from_name: std::env::var("FROM_NAME")
                .unwrap_or_else(|_| "Library Manager".to_string()),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            send_timeout: Duration::from_secs(
                std::env::var("SMTP_SEND_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }
}

/// SMTP-backed confirmation mailer
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: Tera,
    config: EmailConfig,
}

impl EmailService {
    /// Create a new email service
    pub fn new(config: EmailConfig) -> AuthResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| {
                AuthError::Configuration(format!("Failed to configure SMTP relay: {}", e))
            })?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        let mut templates = Tera::new("templates/**/*").unwrap_or_else(|_| {
            debug!("No template directory found, using embedded templates");
            Tera::default()
        });

        Self::add_embedded_templates(&mut templates)?;

        Ok(Self {
            transport,
            templates,
            config,
        })
    }

    /// Add embedded email templates
    fn add_embedded_templates(tera: &mut Tera) -> AuthResult<()> {
        let confirmation_html = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Confirm Your Registration</title>
</head>
<body>
    <p>Hello {{ first_name }} {{ last_name }},</p>

    <p>Thank you for registering with {{ app_name }}. Please confirm your
    account by following the link below:</p>

    <p><a href="{{ confirmation_url }}">{{ confirmation_url }}</a></p>

    <p>Your confirmation code is <strong>{{ confirmation_code }}</strong>.</p>

    <p>If you did not create an account, you can safely ignore this email.</p>

    <p>Best regards,<br>The {{ app_name }} Team</p>
</body>
</html>
        "#;

        let confirmation_text = r#"
Hello {{ first_name }} {{ last_name }},

Thank you for registering with {{ app_name }}. Please confirm your account
by opening the link below:

{{ confirmation_url }}

Your confirmation code is {{ confirmation_code }}.

If you did not create an account, you can safely ignore this email.

Best regards,
The {{ app_name }} Team
        "#;

        tera.add_raw_template("confirmation_email.html", confirmation_html)
            .map_err(|e| AuthError::Configuration(format!("Failed to add HTML template: {}", e)))?;

        tera.add_raw_template("confirmation_email.txt", confirmation_text)
            .map_err(|e| AuthError::Configuration(format!("Failed to add text template: {}", e)))?;

        Ok(())
    }

    fn confirmation_url(&self, to: &str, code: &str) -> String {
        format!(
            "{}/auth/confirm?email={}&code={}",
            self.config.app_base_url, to, code
        )
    }
}

#[async_trait]
impl ConfirmationMailer for EmailService {
    async fn send_confirmation(
        &self,
        to: &str,
        first_name: &str,
        last_name: &str,
        code: &str,
    ) -> AuthResult<bool> {
        info!("Sending confirmation email to: {}", to);

        let mut context = Context::new();
        context.insert("first_name", first_name);
        context.insert("last_name", last_name);
        context.insert("confirmation_code", code);
        context.insert("confirmation_url", &self.confirmation_url(to, code));
        context.insert("app_name", &self.config.from_name);

        let html_body = self
            .templates
            .render("confirmation_email.html", &context)
            .map_err(|e| AuthError::Email(format!("Failed to render HTML template: {}", e)))?;

        let text_body = self
            .templates
            .render("confirmation_email.txt", &context)
            .map_err(|e| AuthError::Email(format!("Failed to render text template: {}", e)))?;

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| {
                        AuthError::Configuration(format!("Invalid from address: {}", e))
                    })?,
            )
            .to(to
                .parse()
                .map_err(|e| AuthError::Email(format!("Invalid recipient email: {}", e)))?)
            .subject("Confirm your registration")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| AuthError::Email(format!("Failed to build email message: {}", e)))?;

        // Bounded send: registration blocks on this call, so a hung relay
        // must surface as a delivery failure rather than a stuck request.
        match tokio::time::timeout(self.config.send_timeout, self.transport.send(message)).await {
            Ok(Ok(_)) => {
                info!("Confirmation email sent successfully to: {}", to);
                Ok(true)
            }
            Ok(Err(e)) => {
                error!("Failed to send confirmation email to {}: {}", to, e);
                Ok(false)
            }
            Err(_) => {
                warn!(
                    "Confirmation email to {} timed out after {:?}",
                    to, self.config.send_timeout
                );
                Ok(false)
            }
        }
    }
}
